//! Shared request state behind an injected capability.
//!
//! The response cache and the rate limiter both need mutable state that
//! outlives a single request. Both go through the [`Store`] trait so the
//! pipeline never touches a module-global; [`MemoryStore`] is the in-process
//! implementation.
//!
//! State held by a `MemoryStore` is process-local and non-durable: it resets
//! on restart and is not shared between server instances, so several
//! instances behind one load balancer each enforce their own limits and keep
//! their own cache. A shared backend (e.g. Redis) would implement the same
//! trait.

mod memory;

pub use memory::MemoryStore;

use crate::analysis::AnalysisResult;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// An immutable cached analysis result.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub value: AnalysisResult,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn new(value: AnalysisResult, ttl: Duration) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.ttl
    }
}

/// Outcome of a sliding-window increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// Whether this request was admitted (and therefore counted).
    pub admitted: bool,
    /// Requests counted in the window, including this one if admitted.
    pub count: u32,
    /// Time until the oldest counted request leaves the window.
    pub reset_after: Duration,
}

/// Storage capability used by the cache and rate limiter.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Fetch an unexpired cache entry.
    async fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Insert or replace a cache entry. Entries are never modified in place.
    async fn set(&self, key: String, entry: CacheEntry);

    /// Count a request for `client` in the trailing `window` ending at `now`.
    ///
    /// When `limit` requests are already in the window the request is not
    /// admitted and the counter is left unchanged.
    async fn increment(
        &self,
        client: &str,
        now: Instant,
        window: Duration,
        limit: u32,
    ) -> WindowCount;

    /// Drop rate windows with no request in the trailing `window`.
    ///
    /// Returns the number of clients forgotten.
    async fn sweep_windows(&self, now: Instant, window: Duration) -> usize;
}
