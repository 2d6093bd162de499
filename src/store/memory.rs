//! In-process [`Store`] backed by moka and DashMap.

use super::{CacheEntry, Store, WindowCount};
use async_trait::async_trait;
use dashmap::DashMap;
use moka::future::Cache;
use moka::Expiry;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Expires each entry after its own TTL.
struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Request timestamps for one client, oldest first.
#[derive(Debug, Default)]
struct SlidingWindow {
    timestamps: VecDeque<Instant>,
}

impl SlidingWindow {
    /// Drop timestamps that fell out of the window and return the remaining count.
    fn count_and_prune(&mut self, now: Instant, window: Duration) -> u32 {
        while let Some(&oldest) = self.timestamps.front() {
            if now.saturating_duration_since(oldest) >= window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
        self.timestamps.len() as u32
    }

    fn reset_after(&self, now: Instant, window: Duration) -> Duration {
        self.timestamps
            .front()
            .map(|&oldest| window.saturating_sub(now.saturating_duration_since(oldest)))
            .unwrap_or(window)
    }
}

/// Process-local store.
///
/// Cache entries live in a bounded moka cache with per-entry expiry. Rate
/// windows live in a DashMap; the per-key shard lock held by `entry()` makes
/// prune-check-record atomic for one client.
pub struct MemoryStore {
    cache: Cache<String, CacheEntry>,
    windows: DashMap<String, SlidingWindow>,
}

impl MemoryStore {
    pub fn new(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_entries)
                .expire_after(EntryExpiry)
                .build(),
            windows: DashMap::new(),
        }
    }

    /// Number of clients with a rate window.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Option<CacheEntry> {
        let entry = self.cache.get(key).await?;
        if entry.is_expired_at(Instant::now()) {
            self.cache.invalidate(key).await;
            return None;
        }
        Some(entry)
    }

    async fn set(&self, key: String, entry: CacheEntry) {
        self.cache.insert(key, entry).await;
    }

    async fn increment(
        &self,
        client: &str,
        now: Instant,
        window: Duration,
        limit: u32,
    ) -> WindowCount {
        let mut slot = self.windows.entry(client.to_string()).or_default();
        let count = slot.count_and_prune(now, window);

        if count >= limit {
            return WindowCount {
                admitted: false,
                count,
                reset_after: slot.reset_after(now, window),
            };
        }

        slot.timestamps.push_back(now);
        WindowCount {
            admitted: true,
            count: count + 1,
            reset_after: slot.reset_after(now, window),
        }
    }

    async fn sweep_windows(&self, now: Instant, window: Duration) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, slot| slot.count_and_prune(now, window) > 0);
        before.saturating_sub(self.windows.len())
    }
}
