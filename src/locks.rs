//! Keyed async locks used to serialize read-modify-write sequences.
//!
//! Services hold one lock per task or per owner for the whole span of an
//! operation, so two operations on the same record never interleave while
//! operations on different records proceed independently.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A set of async mutexes addressed by key, created on demand.
#[derive(Debug)]
pub struct KeyedLocks<K> {
    entries: Mutex<HashMap<K, Slot>>,
}

/// One key's mutex and the number of holders plus waiters using it.
#[derive(Debug, Default)]
struct Slot {
    mutex: Arc<AsyncMutex<()>>,
    users: usize,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty lock set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `key`.
    ///
    /// The entry is dropped again once the last holder or waiter releases
    /// it, including waiters whose future is cancelled before acquiring.
    pub async fn lock(&self, key: K) -> KeyedGuard<'_, K> {
        let mutex = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            let slot = entries.entry(key.clone()).or_default();
            slot.users = slot.users.saturating_add(1);
            Arc::clone(&slot.mutex)
        };
        let lease = Lease { locks: self, key };
        let guard = mutex.lock_owned().await;
        KeyedGuard {
            _guard: guard,
            _lease: lease,
        }
    }

    /// Returns how many keys currently have an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when no key is locked or awaited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration of one holder or waiter; releasing it retires idle entries.
#[derive(Debug)]
struct Lease<'a, K>
where
    K: Eq + Hash + Clone,
{
    locks: &'a KeyedLocks<K>,
    key: K,
}

impl<K> Drop for Lease<'_, K>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        let mut entries = self
            .locks
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let idle = entries.get_mut(&self.key).is_some_and(|slot| {
            slot.users = slot.users.saturating_sub(1);
            slot.users == 0
        });
        if idle {
            entries.remove(&self.key);
        }
    }
}

/// Exclusive access to one key of a [`KeyedLocks`] set.
///
/// Fields drop in order, so the mutex is released before the lease.
#[derive(Debug)]
pub struct KeyedGuard<'a, K>
where
    K: Eq + Hash + Clone,
{
    _guard: OwnedMutexGuard<()>,
    _lease: Lease<'a, K>,
}
