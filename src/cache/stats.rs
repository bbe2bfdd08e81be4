//! Cache Statistics Module
//!
//! Counts lookups, inserts and evictions as the cache serves them.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// `get` calls that found the key
    pub hits: u64,
    /// `get` calls that did not
    pub misses: u64,
    /// `put` calls that stored a new key
    pub insertions: u64,
    /// `put` calls that replaced the value of a cached key
    pub updates: u64,
    /// Keys removed to make room for a new one
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of `get` calls.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing has been looked up.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    // == Recorders ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}
