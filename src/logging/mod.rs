//! Structured logging module for request tracing
//!
//! Filter directive construction, request ID generation, and field helpers
//! for logging analyses without leaking full symptom text at `info`.

pub mod fields;
pub mod request_id;

pub use fields::{outcome_label, preview};
pub use request_id::{generate_request_id, request_id_from, REQUEST_ID_HEADER};

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level
/// and any component-specific log levels configured in the LoggingConfig.
///
/// # Returns
///
/// A filter string in the format: "base_level,symcheck::component1=level1,symcheck::component2=level2"
///
/// # Examples
///
/// ```
/// use symcheck::config::logging::{LogFormat, LoggingConfig};
/// use symcheck::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let mut component_levels = HashMap::new();
/// component_levels.insert("agent".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Pretty,
///     component_levels: Some(component_levels),
/// };
///
/// let filter_str = build_filter_directives(&config);
/// assert_eq!(filter_str, "info,symcheck::agent=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",symcheck::{}={}", component, level));
        }
    }

    filter_str
}
