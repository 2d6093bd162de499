//! Response cache for analysis results.
//!
//! Identical analyses are served from the [`Store`] without calling the model
//! provider. Keys are derived from the normalized request:
//!
//! - `diseases:<sorted, lowercased symptoms joined by ','>`
//! - `treatments:<lowercased disease name>`
//! - `trending`
//!
//! and then reduced to `[a-z0-9:,_-]` so that keys are safe for any backend.
//!
//! There is no single-flight coalescing: concurrent misses for the same key
//! each call the provider, and the last write wins.

use crate::analysis::{AnalysisKind, AnalysisRequest, AnalysisResult};
use crate::config::CacheConfig;
use crate::store::{CacheEntry, Store};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cache key derived from a validated request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_request(request: &AnalysisRequest) -> Self {
        let raw = match request {
            AnalysisRequest::Diseases { symptoms } => {
                let mut normalized: Vec<String> =
                    symptoms.iter().map(|s| s.trim().to_lowercase()).collect();
                normalized.sort();
                normalized.dedup();
                format!("diseases:{}", normalized.join(","))
            }
            AnalysisRequest::Treatments { disease } => {
                format!("treatments:{}", disease.trim().to_lowercase())
            }
            AnalysisRequest::Trending => "trending".to_string(),
        };
        Self(sanitize(&raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Replace every character outside `[a-z0-9:,_-]` with `_`.
fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | ':' | ',' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}

/// TTL-based cache of analysis results.
pub struct ResponseCache {
    store: Arc<dyn Store>,
    config: CacheConfig,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn Store>, config: CacheConfig) -> Self {
        Self { store, config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Lifetime of a freshly written entry of the given kind.
    pub fn ttl_for(&self, kind: AnalysisKind) -> Duration {
        match kind {
            AnalysisKind::Trending => self.config.trending_ttl(),
            AnalysisKind::Diseases | AnalysisKind::Treatments => self.config.ttl(),
        }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<AnalysisResult> {
        if !self.config.enabled {
            return None;
        }
        let entry = self.store.get(key.as_str()).await?;
        debug!(key = key.as_str(), "Cache hit");
        Some(entry.value)
    }

    pub async fn put(&self, key: CacheKey, result: AnalysisResult) {
        if !self.config.enabled {
            return;
        }
        let ttl = self.ttl_for(result.kind());
        self.store.set(key.0, CacheEntry::new(result, ttl)).await;
    }
}
