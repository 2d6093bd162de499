//! Response cache configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Lifetime of `diseases` and `treatments` entries
    pub ttl_seconds: u64,
    /// Revalidation period of the `trending` entry
    pub trending_ttl_seconds: u64,
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 3600,
            trending_ttl_seconds: 86_400,
            max_entries: 10_000,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn trending_ttl(&self) -> Duration {
        Duration::from_secs(self.trending_ttl_seconds)
    }
}
