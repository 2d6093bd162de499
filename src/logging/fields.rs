//! Field helpers for structured logging

use crate::analysis::AnalyzeError;

/// Outcome label for a finished analysis: `"success"` or the error's
/// taxonomy label (`validation`, `rate_limited`, ...).
///
/// # Examples
///
/// ```
/// use symcheck::analysis::AnalyzeError;
/// use symcheck::logging::outcome_label;
///
/// let result: Result<(), AnalyzeError> = Err(AnalyzeError::RateLimited { retry_after_secs: 5 });
/// assert_eq!(outcome_label(&result), "rate_limited");
/// ```
pub fn outcome_label<T>(result: &Result<T, AnalyzeError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(e) => e.error_type(),
    }
}

/// Truncate free text (symptoms, model output) for a debug log preview.
///
/// Cuts on a character boundary and appends `...` when shortened.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
