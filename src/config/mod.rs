//! Configuration module for the symptom checker
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SYMCHECK_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! The model provider API key is deliberately not part of this struct: the
//! analysis pipeline reads the environment variable named by
//! [`ModelConfig::api_key_env`] on every request.
//!
//! # Example
//!
//! ```rust
//! use symcheck::config::SymcheckConfig;
//!
//! let config = SymcheckConfig::default();
//! assert_eq!(config.server.port, 3000);
//!
//! let toml = r#"
//! [rate_limit]
//! requests_per_window = 10
//! "#;
//! let config: SymcheckConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.rate_limit.requests_per_window, 10);
//! assert_eq!(config.rate_limit.window_seconds, 60);
//! ```

pub mod cache;
pub mod error;
pub mod logging;
pub mod model;
pub mod rate_limit;
pub mod server;

pub use cache::CacheConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use model::ModelConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the symptom checker server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SymcheckConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Model provider settings
    pub model: ModelConfig,
    /// Response cache settings
    pub cache: CacheConfig,
    /// Per-client rate limiting
    pub rate_limit: RateLimitConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl SymcheckConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Io {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports SYMCHECK_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        // Server settings
        if let Ok(port) = std::env::var("SYMCHECK_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("SYMCHECK_HOST") {
            self.server.host = host;
        }

        // Logging settings
        if let Ok(level) = std::env::var("SYMCHECK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SYMCHECK_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        // Model provider
        if let Ok(model) = std::env::var("SYMCHECK_MODEL") {
            if !model.is_empty() {
                self.model.model = model;
            }
        }
        if let Ok(url) = std::env::var("SYMCHECK_MODEL_BASE_URL") {
            if !url.is_empty() {
                self.model.base_url = url;
            }
        }

        // Rate limiting
        if let Ok(limit) = std::env::var("SYMCHECK_RATE_LIMIT") {
            if let Ok(n) = limit.parse() {
                self.rate_limit.requests_per_window = n;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.model.validate()?;
        self.logging.validate()?;
        self.rate_limit.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_symcheck_config_defaults() {
        let config = SymcheckConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.model.api_key_env, "GROQ_API_KEY");
        assert!(config.cache.enabled);
        assert_eq!(config.rate_limit.requests_per_window, 5);
    }

    #[test]
    fn test_config_parse_minimal_toml() {
        let toml = r#"
        [server]
        port = 9000
        "#;

        let config: SymcheckConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0"); // Default
    }

    #[test]
    fn test_config_parse_example_toml() {
        let toml = include_str!("../../symcheck.example.toml");
        let config: SymcheckConfig = toml::from_str(toml).unwrap();
        assert!(config.server.port > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_model_section() {
        let toml = r#"
        [model]
        base_url = "https://api.openai.com/v1"
        model = "gpt-4o-mini"
        api_key_env = "OPENAI_API_KEY"
        json_mode = false
        "#;

        let config: SymcheckConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.model.model, "gpt-4o-mini");
        assert_eq!(config.model.api_key_env, "OPENAI_API_KEY");
        assert!(!config.model.json_mode);
        assert_eq!(config.model.max_tokens, 1024); // Default
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server]\nport = 8080").unwrap();

        let config = SymcheckConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server\nport = ").unwrap();

        let result = SymcheckConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = SymcheckConfig::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = SymcheckConfig::load(None).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_config_env_overrides() {
        // One test mutates all variables so parallel tests never race on them.
        std::env::set_var("SYMCHECK_PORT", "9999");
        std::env::set_var("SYMCHECK_HOST", "127.0.0.1");
        std::env::set_var("SYMCHECK_LOG_LEVEL", "debug");
        std::env::set_var("SYMCHECK_LOG_FORMAT", "json");
        std::env::set_var("SYMCHECK_MODEL", "llama-3.1-8b-instant");
        std::env::set_var("SYMCHECK_RATE_LIMIT", "20");
        let config = SymcheckConfig::default().with_env_overrides();

        assert_eq!(config.server.port, 9999);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.model.model, "llama-3.1-8b-instant");
        assert_eq!(config.rate_limit.requests_per_window, 20);

        // Invalid values keep defaults
        std::env::set_var("SYMCHECK_PORT", "not-a-number");
        std::env::set_var("SYMCHECK_LOG_FORMAT", "xml");
        std::env::set_var("SYMCHECK_RATE_LIMIT", "-1");
        let config = SymcheckConfig::default().with_env_overrides();

        for var in [
            "SYMCHECK_PORT",
            "SYMCHECK_HOST",
            "SYMCHECK_LOG_LEVEL",
            "SYMCHECK_LOG_FORMAT",
            "SYMCHECK_MODEL",
            "SYMCHECK_RATE_LIMIT",
        ] {
            std::env::remove_var(var);
        }

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.rate_limit.requests_per_window, 5);
    }

    #[test]
    fn test_config_validation_zero_port() {
        let mut config = SymcheckConfig::default();
        config.server.port = 0;

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "server.port"
        ));
    }

    #[test]
    fn test_config_validation_zero_request_limit() {
        let mut config = SymcheckConfig::default();
        config.rate_limit.requests_per_window = 0;

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "rate_limit.requests_per_window"
        ));
    }

    #[test]
    fn test_config_validation_zero_window() {
        let mut config = SymcheckConfig::default();
        config.rate_limit.window_seconds = 0;

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "rate_limit.window_seconds"
        ));
    }

    #[test]
    fn test_config_validation_delegates_to_model() {
        let mut config = SymcheckConfig::default();
        config.model.temperature = 3.5;

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "model.temperature"
        ));
    }
}
