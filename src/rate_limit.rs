//! Per-client sliding-window rate limiting.
//!
//! Clients are identified by the first address in the configured forwarding
//! header (`x-forwarded-for` by default), or `"unknown"` when it is absent.
//! The header is client-supplied unless a trusted proxy overwrites it, so the
//! limit is advisory against well-behaved callers rather than a security
//! boundary.

use crate::config::RateLimitConfig;
use crate::store::Store;
use axum::http::HeaderMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Identifier used when no forwarding header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request is allowed.
    pub allowed: bool,
    /// The rate limit for this window.
    pub limit: u32,
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// Seconds until the oldest counted request leaves the window (rounded up).
    pub reset_secs: u64,
}

/// Extract the caller's identifier from request headers.
pub fn client_id(headers: &HeaderMap, header_name: &str) -> String {
    headers
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

/// Sliding-window limiter over a [`Store`].
pub struct RateLimiter {
    store: Arc<dyn Store>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn Store>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn client_header(&self) -> &str {
        &self.config.client_header
    }

    /// Check and record a request from `client` at the current time.
    pub async fn check(&self, client: &str) -> RateLimitDecision {
        self.check_at(client, Instant::now()).await
    }

    /// Check and record a request from `client` at `now`.
    ///
    /// Admitted requests are counted; rejected ones are not.
    pub async fn check_at(&self, client: &str, now: Instant) -> RateLimitDecision {
        let limit = self.config.requests_per_window;
        if !self.config.enabled {
            return RateLimitDecision {
                allowed: true,
                limit,
                remaining: u32::MAX,
                reset_secs: 0,
            };
        }

        let window = self.config.window();
        let count = self.store.increment(client, now, window, limit).await;
        let reset = count.reset_after;

        RateLimitDecision {
            allowed: count.admitted,
            limit,
            remaining: limit.saturating_sub(count.count),
            reset_secs: reset.as_secs() + u64::from(reset.subsec_nanos() > 0),
        }
    }

    /// Periodically forget clients whose window has emptied.
    ///
    /// Runs once per window until `cancel_token` fires. Without it the store
    /// keeps one window per distinct client address for the process lifetime.
    pub fn spawn_sweeper(&self, cancel_token: CancellationToken) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let window = self.config.window();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(window);
            // The first tick completes immediately
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::debug!("Rate window sweeper shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let removed = store.sweep_windows(Instant::now(), window).await;
                        if removed > 0 {
                            tracing::debug!(removed, "Swept idle rate windows");
                        }
                    }
                }
            }
        })
    }
}
