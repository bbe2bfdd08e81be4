//! Shared Cache Handle
//!
//! The cache itself is single-threaded. `SharedCache` serializes every call
//! behind one mutex so index and store are never observed mid-update.

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{Cache, CacheStats, Policy};
use crate::config::Config;
use crate::error::Result;

/// Cloneable, thread-safe handle to a [`Cache`].
///
/// Each method holds the lock for exactly one cache operation. Values come
/// back as owned clones so nothing borrowed outlives the lock.
pub struct SharedCache<K, V> {
    inner: Arc<Mutex<Cache<K, V>>>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Wraps an existing cache.
    pub fn new(cache: Cache<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Creates a shared cache from configuration.
    ///
    /// Fails with `InvalidCapacity` like [`Cache::from_config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Cache::from_config(config).map(Self::new)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    pub fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn policy(&self) -> Policy {
        self.inner.lock().policy()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// Runs several operations under a single lock acquisition.
    ///
    /// Useful for read-modify-write sequences that must not interleave with
    /// other callers.
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut Cache<K, V>) -> R) -> R {
        let mut cache = self.inner.lock();
        f(&mut cache)
    }
}
