//! In-memory implementation of the SnapshotCache trait.
//!
//! Timestamps come from `tokio::time::Instant`, so tests can drive expiry
//! with a paused clock.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::time::Instant;
use x402_registry_core::{Snapshot, TopicId};

use crate::traits::{CacheStats, SnapshotCache, DEFAULT_TTL};

struct CacheEntry {
    data: Arc<Snapshot>,
    stored_at: Instant,
}

/// In-memory TTL cache.
///
/// All data is lost when the cache is dropped. Thread-safe via RwLock.
pub struct MemoryCache {
    ttl: Duration,
    entries: RwLock<HashMap<TopicId, CacheEntry>>,
}

impl MemoryCache {
    /// Create a cache with the default 30 second TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.duration_since(entry.stored_at) <= self.ttl
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotCache for MemoryCache {
    fn get(&self, topic: &TopicId) -> Option<Arc<Snapshot>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(topic) {
                None => return None,
                Some(entry) if self.is_fresh(entry, now) => return Some(Arc::clone(&entry.data)),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another writer may have refreshed the entry in between.
        if entries.get(topic).is_some_and(|e| !self.is_fresh(e, now)) {
            entries.remove(topic);
            tracing::debug!(topic = %topic, "evicted expired snapshot");
        }
        None
    }

    fn set(&self, topic: &TopicId, snapshot: Arc<Snapshot>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            topic.clone(),
            CacheEntry {
                data: snapshot,
                stored_at: Instant::now(),
            },
        );
    }

    fn invalidate(&self, topic: &TopicId) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(topic);
    }

    fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    fn stats(&self) -> CacheStats {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        CacheStats {
            size: entries.len(),
            ttl: self.ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use x402_registry_core::{DirectoryEntry, HttpMethod, UsdcAmount};

    fn topic(s: &str) -> TopicId {
        TopicId::parse(s).unwrap()
    }

    fn snapshot(ids: &[&str]) -> Arc<Snapshot> {
        let entries = ids
            .iter()
            .map(|id| DirectoryEntry {
                id: id.to_string(),
                url: "https://example.com".into(),
                method: HttpMethod::Get,
                description: String::new(),
                pointer_topic_id: topic("0.0.9"),
                initial_price_usdc: UsdcAmount::ZERO,
            })
            .collect();
        Arc::new(Snapshot::from_entries(entries))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_until_ttl() {
        let cache = MemoryCache::with_ttl(Duration::from_secs(30));
        let t = topic("0.0.1");
        cache.set(&t, snapshot(&["aaa"]));

        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(cache.get(&t).unwrap().len(), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get(&t).is_some(), "exactly ttl old is still fresh");

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(cache.get(&t).is_none());
        assert_eq!(cache.stats().size, 0, "expired entry is evicted on read");
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_restarts_clock() {
        let cache = MemoryCache::new();
        let t = topic("0.0.1");
        cache.set(&t, snapshot(&["aaa"]));

        tokio::time::advance(Duration::from_secs(20)).await;
        cache.set(&t, snapshot(&["aaa", "bbb"]));

        tokio::time::advance(Duration::from_secs(20)).await;
        assert_eq!(cache.get(&t).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = MemoryCache::new();
        cache.set(&topic("0.0.1"), snapshot(&["aaa"]));
        cache.set(&topic("0.0.2"), snapshot(&["bbb", "ccc"]));

        assert_eq!(cache.get(&topic("0.0.1")).unwrap().len(), 1);
        assert_eq!(cache.get(&topic("0.0.2")).unwrap().len(), 2);
        assert!(cache.get(&topic("0.0.3")).is_none());

        cache.invalidate(&topic("0.0.1"));
        assert!(cache.get(&topic("0.0.1")).is_none());
        assert_eq!(cache.stats().size, 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = MemoryCache::new();
        cache.set(&topic("0.0.1"), snapshot(&["aaa"]));
        cache.set(&topic("0.0.2"), snapshot(&["bbb"]));
        cache.clear();

        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.ttl, DEFAULT_TTL);
    }
}
