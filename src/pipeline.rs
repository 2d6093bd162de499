//! The analysis pipeline behind `POST /api/analyze`.
//!
//! ```text
//! body ─► validate ─► rate limit ─► API key ─► cache ──hit──► result
//!                                                 │
//!                                                miss
//!                                                 ▼
//!                                 prompt ─► model ─► parse ─► cache put ─► result
//! ```
//!
//! Every step either advances or ends the request with an [`AnalyzeError`];
//! nothing is retried. The HTTP layer and the `analyze` CLI command both
//! drive the same [`Analyzer`].

use crate::agent::{ChatCompletionAgent, ModelClient};
use crate::analysis::{
    build_prompt, parse_response, validate_request, AnalysisKind, AnalysisRequest,
    AnalysisResult, AnalyzeError, Prompt,
};
use crate::cache::{CacheKey, ResponseCache};
use crate::config::SymcheckConfig;
use crate::logging::{outcome_label, preview};
use crate::metrics;
use crate::rate_limit::RateLimiter;
use crate::store::{MemoryStore, Store};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Error body text for a missing provider credential.
pub const MISSING_API_KEY: &str = "Model provider API key not configured";

/// A successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub result: AnalysisResult,
    /// Served from the response cache without calling the model
    pub cache_hit: bool,
}

/// Runs analyses against a model provider with shared cache and rate state.
pub struct Analyzer {
    agent: Arc<dyn ModelClient>,
    cache: ResponseCache,
    limiter: RateLimiter,
    api_key_env: String,
}

impl Analyzer {
    pub fn new(config: &SymcheckConfig, agent: Arc<dyn ModelClient>, store: Arc<dyn Store>) -> Self {
        Self {
            agent,
            cache: ResponseCache::new(Arc::clone(&store), config.cache.clone()),
            limiter: RateLimiter::new(store, config.rate_limit.clone()),
            api_key_env: config.model.api_key_env.clone(),
        }
    }

    /// Build an analyzer with the OpenAI-compatible agent and an in-memory store.
    pub fn from_config(config: &SymcheckConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()?;
        let agent = Arc::new(ChatCompletionAgent::new(&config.model, client));
        let store = Arc::new(MemoryStore::new(config.cache.max_entries));
        Ok(Self::new(config, agent, store))
    }

    pub fn agent_name(&self) -> &str {
        self.agent.name()
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Run one analysis.
    ///
    /// `client` identifies the caller for rate limiting; `None` skips the
    /// limiter entirely (local CLI use).
    pub async fn analyze(
        &self,
        body: &Value,
        client: Option<&str>,
    ) -> Result<Analysis, AnalyzeError> {
        let request = match validate_request(body) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "Rejected analysis request");
                metrics::record_request("invalid", "validation");
                return Err(e.into());
            }
        };

        let kind = request.kind();
        let started = Instant::now();
        let outcome = self.run(request, client).await;
        let status = outcome_label(&outcome);

        metrics::record_request(kind.as_str(), status);
        match &outcome {
            Ok(analysis) => info!(
                kind = kind.as_str(),
                cache = if analysis.cache_hit { "hit" } else { "miss" },
                latency_ms = started.elapsed().as_millis() as u64,
                "Analysis complete"
            ),
            Err(e) => warn!(
                kind = kind.as_str(),
                error_type = status,
                error = %e,
                latency_ms = started.elapsed().as_millis() as u64,
                "Analysis failed"
            ),
        }

        outcome
    }

    async fn run(
        &self,
        request: AnalysisRequest,
        client: Option<&str>,
    ) -> Result<Analysis, AnalyzeError> {
        let kind = request.kind();

        if let Some(client) = client {
            let decision = self.limiter.check(client).await;
            if !decision.allowed {
                metrics::record_rate_limited();
                return Err(AnalyzeError::RateLimited {
                    retry_after_secs: decision.reset_secs,
                });
            }
            debug!(client, remaining = decision.remaining, "Rate limit check passed");
        }

        let api_key = self.api_key()?;

        let key = CacheKey::for_request(&request);
        if self.cache.is_enabled() {
            if let Some(result) = self.cache.get(&key).await {
                metrics::record_cache_lookup(kind.as_str(), true);
                return Ok(Analysis {
                    result,
                    cache_hit: true,
                });
            }
            metrics::record_cache_lookup(kind.as_str(), false);
        }

        let prompt = build_prompt(&request);
        debug!(kind = kind.as_str(), user = %preview(&prompt.user, 200), "Calling model");

        let text = self.call_model(kind, &api_key, &prompt).await?;
        debug!(response = %preview(&text, 500), "Model replied");

        let result = parse_response(kind, &text)?;
        self.cache.put(key, result.clone()).await;

        Ok(Analysis {
            result,
            cache_hit: false,
        })
    }

    async fn call_model(
        &self,
        kind: AnalysisKind,
        api_key: &str,
        prompt: &Prompt,
    ) -> Result<String, AnalyzeError> {
        let started = Instant::now();
        let result = self.agent.complete(api_key, prompt).await;
        metrics::record_upstream_duration(kind.as_str(), started.elapsed());
        result.map_err(AnalyzeError::from)
    }

    /// Read the provider credential from the environment.
    fn api_key(&self) -> Result<String, AnalyzeError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(AnalyzeError::Configuration(MISSING_API_KEY.to_string())),
        }
    }
}
