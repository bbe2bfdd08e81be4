//! Cache Store Module
//!
//! The cache façade: combines the entry store with the eviction index of the
//! configured policy and enforces the capacity bound.

use std::hash::Hash;

use tracing::{debug, trace};

use crate::cache::{CacheStats, EntryStore, EvictionIndex, Policy, PolicyIndex};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cache ==
/// Capacity-bounded key/value cache with LRU or LFU eviction.
///
/// `get` and `put` run in O(1) amortized time under both policies. The cache
/// is not internally synchronized; see [`SharedCache`](crate::SharedCache)
/// for a handle that can be used from several threads.
#[derive(Debug)]
pub struct Cache<K, V> {
    /// Key-value storage
    entries: EntryStore<K, V>,
    /// Recency or frequency ordering of the stored keys
    index: PolicyIndex<K>,
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructors ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 is accepted and yields a cache that never stores
    /// anything: every `put` is dropped and every `get` misses.
    pub fn new(capacity: usize, policy: Policy) -> Self {
        debug!(%policy, capacity, "cache created");
        Self {
            entries: EntryStore::new(),
            index: PolicyIndex::new(policy),
            stats: CacheStats::new(),
            capacity,
        }
    }

    /// Creates a cache from an untrusted, signed capacity.
    ///
    /// # Errors
    /// `CacheError::InvalidCapacity` when `capacity` is zero or negative.
    pub fn try_new(capacity: i64, policy: Policy) -> Result<Self> {
        if capacity <= 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        let capacity =
            usize::try_from(capacity).map_err(|_| CacheError::InvalidCapacity(capacity))?;
        Ok(Self::new(capacity, policy))
    }

    /// Creates a cache from a [`Config`], validating its capacity.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::try_new(config.capacity, config.policy)
    }

    // == Get ==
    /// Retrieves a value by key, counting the lookup as an access.
    ///
    /// Under LRU the key becomes the most recently used; under LFU its
    /// frequency goes up by one. A miss is `None`, never an error.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.entries.contains(key) {
            self.stats.record_miss();
            trace!(policy = %self.policy(), "cache miss");
            return None;
        }

        self.index.record_access(key);
        self.stats.record_hit();
        trace!(policy = %self.policy(), "cache hit");
        self.entries.get(key)
    }

    // == Put ==
    /// Stores a key-value pair.
    ///
    /// If the key already exists, the value is replaced and the write counts
    /// as an access. If the cache is full, the policy's eviction candidate is
    /// removed first and the new key enters at the freshest position.
    pub fn put(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            trace!("zero-capacity cache dropped insert");
            return;
        }

        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            self.index.record_access(&key);
            self.stats.record_update();
            return;
        }

        if self.entries.len() >= self.capacity {
            self.evict();
        }

        self.index.insert_fresh(key.clone());
        self.entries.insert(key, value);
        self.stats.record_insertion();
    }

    // == Evict ==
    /// Removes the index's eviction candidate from both index and store.
    fn evict(&mut self) {
        let Some(victim) = self.index.eviction_candidate().cloned() else {
            return;
        };
        self.index.remove(&victim);
        self.entries.remove(&victim);
        self.stats.record_eviction();
        debug!(
            policy = %self.policy(),
            len = self.entries.len(),
            capacity = self.capacity,
            "evicted entry"
        );
    }

    // == Inspection ==
    /// Returns a value without counting an access.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Checks presence without counting an access.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    /// Access count of a cached key under LFU; `None` under LRU.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.index.frequency(key)
    }

    pub fn policy(&self) -> Policy {
        self.index.policy()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert!(self.entries.len() <= self.capacity, "capacity exceeded");
        assert_eq!(self.entries.len(), self.index.len(), "store and index sizes differ");
        for key in self.entries.keys() {
            assert!(self.index.contains(key), "stored key missing from index");
        }
        self.index.check_invariants();
    }
}
