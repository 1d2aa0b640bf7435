//! One async mutex per key.
//!
//! Holding a [`KeyedGuard`] for a topic excludes every other holder of the
//! same topic in this process. Guards for different topics never contend.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Exclusive hold on one key; released on drop.
#[derive(Debug)]
pub struct KeyedGuard {
    _guard: OwnedMutexGuard<()>,
}

/// A set of async mutexes created on demand, one per key.
///
/// Mutexes nobody holds or waits on are pruned on the next `lock` call.
pub struct KeyedLocks<K> {
    locks: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Wait for exclusive hold on `key`.
    pub async fn lock(&self, key: &K) -> KeyedGuard {
        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, m| Arc::strong_count(m) > 1);
            Arc::clone(locks.entry(key.clone()).or_default())
        };
        KeyedGuard {
            _guard: mutex.lock_owned().await,
        }
    }

    /// Number of keys currently held or waited on (plus any not yet pruned).
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash + Clone> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self::new()
    }
}
