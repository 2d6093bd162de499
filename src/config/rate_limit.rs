//! Rate limiting configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-client sliding-window rate limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Requests admitted per client within one window
    pub requests_per_window: u32,
    pub window_seconds: u64,
    /// Header carrying the client address. Client-supplied unless a trusted
    /// proxy overwrites it.
    pub client_header: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_window: 5,
            window_seconds: 60,
            client_header: "x-forwarded-for".to_string(),
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }

    /// A zero limit would reject every request; a zero window never resets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.requests_per_window == 0 {
            return Err(ConfigError::Validation {
                field: "rate_limit.requests_per_window".to_string(),
                message: "limit must be at least one request (set enabled = false to disable)"
                    .to_string(),
            });
        }
        if self.window_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "rate_limit.window_seconds".to_string(),
                message: "window must be at least one second".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_config_defaults() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.requests_per_window, 5);
        assert_eq!(config.window(), Duration::from_secs(60));
        assert_eq!(config.client_header, "x-forwarded-for");
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let config = RateLimitConfig {
            requests_per_window: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "rate_limit.requests_per_window"
        ));
        assert!(RateLimitConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rate_limit_config_parse() {
        let config: RateLimitConfig =
            toml::from_str("requests_per_window = 30\nclient_header = \"x-real-ip\"").unwrap();
        assert_eq!(config.requests_per_window, 30);
        assert_eq!(config.client_header, "x-real-ip");
        assert_eq!(config.window_seconds, 60);
    }
}
