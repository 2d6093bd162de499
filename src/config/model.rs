//! Model provider configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};

/// Chat-completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// OpenAI-compatible API root; `/chat/completions` is appended
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Environment variable holding the Bearer credential, read per request
    pub api_key_env: String,
    /// Deadline for a single provider call
    pub timeout_seconds: u64,
    /// Ask the provider for structured JSON output
    pub json_mode: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_seconds: 30,
            json_mode: true,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, message: &str| ConfigError::Validation {
            field: format!("model.{}", field),
            message: message.to_string(),
        };

        if self.base_url.trim().is_empty() {
            return Err(invalid("base_url", "URL cannot be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(invalid("model", "model name cannot be empty"));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(invalid("api_key_env", "variable name cannot be empty"));
        }
        if self.max_tokens == 0 {
            return Err(invalid("max_tokens", "must be greater than zero"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid("temperature", "must be between 0.0 and 2.0"));
        }
        if self.timeout_seconds == 0 {
            return Err(invalid("timeout_seconds", "must be greater than zero"));
        }

        Ok(())
    }
}
