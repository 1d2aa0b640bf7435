//! # x402 Registry Cache
//!
//! Time-bounded caching of directory snapshots, and per-topic async locks.
//!
//! ## Overview
//!
//! Replaying a directory topic means paging through every message it ever
//! carried. The [`SnapshotCache`] trait lets the registry skip that work
//! while a previous result is still fresh. [`MemoryCache`] is the in-process
//! implementation; there is no persistence and no cross-process sharing.
//!
//! [`KeyedLocks`] hands out one async mutex per topic. The registry uses it
//! to coalesce concurrent replays of the same directory topic and to
//! serialize price updates to the same pointer topic.
//!
//! ## Design Notes
//!
//! - **No stale reads**: an entry older than the TTL is evicted on read, never served
//! - **No negative caching**: only successful replays are ever stored
//! - **Whole-value replacement**: `set` swaps the snapshot atomically per key

pub mod keyed;
pub mod memory;
pub mod traits;

pub use keyed::{KeyedGuard, KeyedLocks};
pub use memory::MemoryCache;
pub use traits::{CacheStats, SnapshotCache, DEFAULT_TTL};
