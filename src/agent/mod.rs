//! Model provider client.
//!
//! The [`ModelClient`] trait is the seam between the analysis pipeline and the
//! external chat-completion API. Production uses [`ChatCompletionAgent`]
//! (any OpenAI-compatible endpoint, Groq by default); tests substitute
//! wiremock servers or counting stubs.

use async_trait::async_trait;

pub mod error;
pub mod openai;
pub mod types;

pub use error::AgentError;
pub use openai::ChatCompletionAgent;

use crate::analysis::Prompt;

/// A single-shot chat-completion call.
///
/// # Cancellation Safety
///
/// Dropping the returned future aborts the in-flight HTTP request.
#[async_trait]
pub trait ModelClient: Send + Sync + 'static {
    /// Human-readable name for logging (e.g., "groq/llama-3.3-70b-versatile").
    fn name(&self) -> &str;

    /// Send `prompt` and return the raw text of the first choice.
    ///
    /// `api_key` is resolved by the caller on every request so that a missing
    /// credential is detected before any network activity.
    ///
    /// # Returns
    ///
    /// - `Ok(String)` with non-empty message content
    /// - `Err(AgentError::Upstream)` if the provider returned a non-2xx status
    /// - `Err(AgentError::Network)` if the connection failed
    /// - `Err(AgentError::Timeout)` if the request exceeded its deadline
    /// - `Err(AgentError::InvalidResponse)` if the body is malformed or has no content
    async fn complete(&self, api_key: &str, prompt: &Prompt) -> Result<String, AgentError>;
}
