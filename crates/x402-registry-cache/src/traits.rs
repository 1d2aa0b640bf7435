//! SnapshotCache trait: the abstract interface for snapshot caching.

use std::sync::Arc;
use std::time::Duration;

use x402_registry_core::{Snapshot, TopicId};

/// Default freshness window for cached snapshots.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries currently held (fresh or not yet evicted).
    pub size: usize,
    /// Freshness window.
    pub ttl: Duration,
}

/// A keyed, time-bounded snapshot store.
///
/// Implementations must be safe for concurrent readers and writers.
///
/// # Design Notes
///
/// - `get` returns a snapshot only if it was stored no more than `ttl` ago.
///   An expired entry is removed and reported as a miss.
/// - `set` replaces any existing entry unconditionally and restarts its clock.
pub trait SnapshotCache: Send + Sync {
    /// Get a fresh snapshot for a topic, evicting it if expired.
    fn get(&self, topic: &TopicId) -> Option<Arc<Snapshot>>;

    /// Store a snapshot for a topic.
    fn set(&self, topic: &TopicId, snapshot: Arc<Snapshot>);

    /// Drop the entry for one topic.
    fn invalidate(&self, topic: &TopicId);

    /// Drop every entry.
    fn clear(&self);

    fn stats(&self) -> CacheStats;
}

impl<C: SnapshotCache + ?Sized> SnapshotCache for Arc<C> {
    fn get(&self, topic: &TopicId) -> Option<Arc<Snapshot>> {
        (**self).get(topic)
    }

    fn set(&self, topic: &TopicId, snapshot: Arc<Snapshot>) {
        (**self).set(topic, snapshot)
    }

    fn invalidate(&self, topic: &TopicId) {
        (**self).invalidate(topic)
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn stats(&self) -> CacheStats {
        (**self).stats()
    }
}
