//! LRU Index Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::arena::{KeyList, NodeArena, NodeId};
use crate::cache::EvictionIndex;

// == LRU Index ==
/// Tracks access order for LRU eviction strategy.
///
/// Keys live in an arena-backed doubly linked list where:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// The `nodes` table maps each key to its list node, so relocating a key
/// never walks the list.
#[derive(Debug)]
pub struct LruIndex<K> {
    /// Node storage for the recency list
    arena: NodeArena<K>,
    /// Order of keys by access time
    order: KeyList,
    /// Key -> list node
    nodes: HashMap<K, NodeId>,
}

impl<K> Default for LruIndex<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> LruIndex<K>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a new empty LRU index.
    pub fn new() -> Self {
        let mut arena = NodeArena::new();
        let order = arena.new_list();
        Self {
            arena,
            order,
            nodes: HashMap::new(),
        }
    }

    // == Iteration ==
    /// Iterates keys from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.arena.iter(&self.order).map(|(_, key)| key)
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert_eq!(self.order.len(), self.nodes.len(), "list and table sizes differ");
        let mut walked = 0;
        for (id, key) in self.arena.iter(&self.order) {
            assert_eq!(self.nodes.get(key), Some(&id), "table points at wrong node");
            walked += 1;
        }
        assert_eq!(walked, self.nodes.len(), "list walk skipped nodes");
        // Two sentinels plus one node per key
        assert_eq!(self.arena.live(), self.nodes.len() + 2, "leaked arena slots");
    }
}

impl<K> EvictionIndex<K> for LruIndex<K>
where
    K: Eq + Hash + Clone,
{
    // == Record Access ==
    /// Marks a key as recently used (moves to front).
    fn record_access(&mut self, key: &K) -> bool {
        let Some(&id) = self.nodes.get(key) else {
            return false;
        };
        self.arena.unlink(&mut self.order, id);
        self.arena.link_front(&mut self.order, id);
        true
    }

    // == Insert Fresh ==
    /// Adds a key at the front (most recent).
    fn insert_fresh(&mut self, key: K) {
        if self.record_access(&key) {
            return;
        }
        let id = self.arena.push_front(&mut self.order, key.clone());
        self.nodes.insert(key, id);
    }

    // == Eviction Candidate ==
    /// Returns the least recently used key without removing it.
    fn eviction_candidate(&self) -> Option<&K> {
        self.arena
            .back(&self.order)
            .and_then(|id| self.arena.key(id))
    }

    // == Remove ==
    /// Removes a key from the index.
    fn remove(&mut self, key: &K) -> bool {
        match self.nodes.remove(key) {
            Some(id) => {
                self.arena.remove(&mut self.order, id);
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.nodes.contains_key(key)
    }
}
