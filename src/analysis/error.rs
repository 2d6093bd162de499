//! Error taxonomy for the analysis pipeline.

use super::parser::ParseError;
use super::validate::ValidationError;
use crate::agent::AgentError;
use thiserror::Error;

/// Every way an `/api/analyze` request can fail.
///
/// Each variant maps to exactly one HTTP status in the API layer; none of
/// them are retried inside the pipeline.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    /// Malformed or oversized request payload (400).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Caller exceeded its request budget for the current window (429).
    #[error("Rate limit exceeded. Retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Server is missing required configuration such as the API key (500).
    #[error("{0}")]
    Configuration(String),

    /// Model provider failed or returned an unusable envelope (500).
    #[error(transparent)]
    Upstream(#[from] AgentError),

    /// Model replied but the content could not be coerced into a result (500).
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl AnalyzeError {
    /// Short machine-readable label used for metrics and logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            AnalyzeError::Validation(_) => "validation",
            AnalyzeError::RateLimited { .. } => "rate_limited",
            AnalyzeError::Configuration(_) => "configuration",
            AnalyzeError::Upstream(_) => "upstream",
            AnalyzeError::Parse(_) => "parse",
        }
    }
}
