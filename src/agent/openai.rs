//! OpenAI-compatible chat-completion agent.

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat, UpstreamErrorBody,
};
use super::{AgentError, ModelClient};
use crate::analysis::Prompt;
use crate::config::ModelConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Chat-completion agent for OpenAI-compatible providers.
///
/// Sends one `POST {base_url}/chat/completions` per call with Bearer
/// authentication. Never retries: failures surface immediately.
pub struct ChatCompletionAgent {
    /// Human-readable name
    name: String,
    /// Base URL (e.g., "https://api.groq.com/openai/v1")
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    /// Request `response_format: {"type": "json_object"}`
    json_mode: bool,
    /// Per-request deadline
    timeout: Duration,
    /// Shared HTTP client for connection pooling
    client: Client,
}

impl ChatCompletionAgent {
    pub fn new(config: &ModelConfig, client: Client) -> Self {
        Self {
            name: format!("{}/{}", provider_label(&config.base_url), config.model),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            json_mode: config.json_mode,
            timeout: Duration::from_secs(config.timeout_seconds),
            client,
        }
    }

    fn build_request(&self, prompt: &Prompt) -> ChatCompletionRequest {
        ChatCompletionRequest {
            messages: vec![
                ChatMessage::system(prompt.system.clone()),
                ChatMessage::user(prompt.user.clone()),
            ],
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: self.json_mode.then(ResponseFormat::json_object),
        }
    }
}

#[async_trait]
impl ModelClient for ChatCompletionAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, api_key: &str, prompt: &Prompt) -> Result<String, AgentError> {
        let url = format!("{}/chat/completions", self.base_url);
        let timeout_ms = self.timeout.as_millis() as u64;

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {}", api_key))
            .json(&self.build_request(prompt))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Timeout(timeout_ms)
                } else {
                    AgentError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<UpstreamErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(AgentError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                AgentError::Timeout(timeout_ms)
            } else {
                AgentError::InvalidResponse(format!("Failed to read response body: {}", e))
            }
        })?;

        let completion: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            AgentError::InvalidResponse(format!("Failed to parse completion response: {}", e))
        })?;

        let content = completion
            .first_content()
            .ok_or_else(|| AgentError::InvalidResponse("no message content".to_string()))?;

        debug!(agent = %self.name, chars = content.len(), "Model response received");
        Ok(content.trim().to_string())
    }
}

/// Short provider label from the base URL host ("api.groq.com" → "groq").
fn provider_label(base_url: &str) -> String {
    let host = base_url
        .split("://")
        .nth(1)
        .unwrap_or(base_url)
        .split(['/', ':'])
        .next()
        .unwrap_or_default();

    if host.parse::<std::net::IpAddr>().is_ok() {
        return host.to_string();
    }

    let parts: Vec<&str> = host.split('.').collect();
    match parts.len() {
        0 | 1 => host.to_string(),
        n => parts[n - 2].to_string(),
    }
}
