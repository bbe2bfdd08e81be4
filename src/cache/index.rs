//! Eviction Index Module
//!
//! The seam between the cache façade and its eviction policies. An index
//! tracks keys only; values live in the entry store.

use std::hash::Hash;

use crate::cache::{LfuIndex, LruIndex, Policy};

// == Eviction Index Trait ==
/// Ordering structure that decides which key leaves the cache next.
///
/// Every method runs in O(1) amortized time.
pub trait EvictionIndex<K> {
    /// Notes an access to a tracked key. Returns `false` if the key is not
    /// tracked.
    fn record_access(&mut self, key: &K) -> bool;

    /// Starts tracking a new key at the freshest position.
    ///
    /// A key that is already tracked is treated as an access instead.
    fn insert_fresh(&mut self, key: K);

    /// The key that would be evicted next, if any.
    fn eviction_candidate(&self) -> Option<&K>;

    /// Stops tracking a key. Returns `false` if the key was not tracked.
    fn remove(&mut self, key: &K) -> bool;

    /// Number of tracked keys.
    fn len(&self) -> usize;

    fn contains(&self, key: &K) -> bool;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == Policy Index ==
/// The index a cache was built with.
#[derive(Debug)]
pub enum PolicyIndex<K> {
    Lru(LruIndex<K>),
    Lfu(LfuIndex<K>),
}

impl<K> PolicyIndex<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty index for the given policy.
    pub fn new(policy: Policy) -> Self {
        match policy {
            Policy::Lru => PolicyIndex::Lru(LruIndex::new()),
            Policy::Lfu => PolicyIndex::Lfu(LfuIndex::new()),
        }
    }

    pub fn policy(&self) -> Policy {
        match self {
            PolicyIndex::Lru(_) => Policy::Lru,
            PolicyIndex::Lfu(_) => Policy::Lfu,
        }
    }

    /// Access count of a key under LFU. Always `None` under LRU.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        match self {
            PolicyIndex::Lru(_) => None,
            PolicyIndex::Lfu(lfu) => lfu.frequency(key),
        }
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        match self {
            PolicyIndex::Lru(lru) => lru.check_invariants(),
            PolicyIndex::Lfu(lfu) => lfu.check_invariants(),
        }
    }
}

impl<K> EvictionIndex<K> for PolicyIndex<K>
where
    K: Eq + Hash + Clone,
{
    fn record_access(&mut self, key: &K) -> bool {
        match self {
            PolicyIndex::Lru(lru) => lru.record_access(key),
            PolicyIndex::Lfu(lfu) => lfu.record_access(key),
        }
    }

    fn insert_fresh(&mut self, key: K) {
        match self {
            PolicyIndex::Lru(lru) => lru.insert_fresh(key),
            PolicyIndex::Lfu(lfu) => lfu.insert_fresh(key),
        }
    }

    fn eviction_candidate(&self) -> Option<&K> {
        match self {
            PolicyIndex::Lru(lru) => lru.eviction_candidate(),
            PolicyIndex::Lfu(lfu) => lfu.eviction_candidate(),
        }
    }

    fn remove(&mut self, key: &K) -> bool {
        match self {
            PolicyIndex::Lru(lru) => lru.remove(key),
            PolicyIndex::Lfu(lfu) => lfu.remove(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            PolicyIndex::Lru(lru) => lru.len(),
            PolicyIndex::Lfu(lfu) => lfu.len(),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match self {
            PolicyIndex::Lru(lru) => lru.contains(key),
            PolicyIndex::Lfu(lfu) => lfu.contains(key),
        }
    }
}
