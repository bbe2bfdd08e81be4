//! Entry Store Module
//!
//! Authoritative key -> value storage. Eviction indexes only ever hold keys,
//! so this is the single place a value lives and the single answer to
//! "is this key cached".

use std::collections::HashMap;
use std::hash::Hash;

// == Entry Store ==
#[derive(Debug)]
pub struct EntryStore<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for EntryStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EntryStore<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores a value, returning the one it replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }
}
