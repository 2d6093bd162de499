//! Error types for model provider calls.

use thiserror::Error;

/// Errors that can occur while calling the model provider.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Model provider request timed out after {0}ms")]
    Timeout(u64),

    /// Provider returned an error response (4xx, 5xx).
    #[error("Model provider error: {status} - {message}")]
    Upstream { status: u16, message: String },

    /// Provider response doesn't match the chat-completion format, or carries
    /// no message content.
    #[error("Invalid response from AI model: {0}")]
    InvalidResponse(String),
}

impl AgentError {
    /// Upstream HTTP status, when the provider answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AgentError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
