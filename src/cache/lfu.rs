//! LFU Index Module
//!
//! Implements Least Frequently Used tracking for cache eviction.
//!
//! Keys are grouped into frequency buckets. Each bucket is an arena-backed
//! list ordered oldest first, so the front of the lowest bucket is always
//! the eviction candidate: lowest frequency, and among equal frequencies the
//! key that reached that frequency earliest.

use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::arena::{KeyList, NodeArena, NodeId};
use crate::cache::EvictionIndex;

/// Frequency of a key and its node inside that frequency's bucket.
#[derive(Debug, Clone, Copy)]
struct FrequencySlot {
    frequency: u64,
    node: NodeId,
}

/// Keys sharing one frequency, chained to the neighbouring buckets.
#[derive(Debug)]
struct Bucket {
    keys: KeyList,
    /// Next lower present frequency
    prev: Option<u64>,
    /// Next higher present frequency
    next: Option<u64>,
}

// == LFU Index ==
/// Tracks access counts for LFU eviction strategy.
///
/// Present buckets form a chain in ascending frequency order starting at
/// `min_frequency`. Invariants between calls:
/// - a bucket is present iff it holds at least one key
/// - `min_frequency` is the lowest present bucket, `None` iff empty
#[derive(Debug)]
pub struct LfuIndex<K> {
    /// Node storage shared by every bucket
    arena: NodeArena<K>,
    key_frequency: HashMap<K, FrequencySlot>,
    frequency_buckets: HashMap<u64, Bucket>,
    min_frequency: Option<u64>,
}

impl<K> Default for LfuIndex<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> LfuIndex<K>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a new empty LFU index.
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            key_frequency: HashMap::new(),
            frequency_buckets: HashMap::new(),
            min_frequency: None,
        }
    }

    // == Inspection ==
    /// Access count of a tracked key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.key_frequency.get(key).map(|slot| slot.frequency)
    }

    /// Lowest frequency with at least one key.
    pub fn min_frequency(&self) -> Option<u64> {
        self.min_frequency
    }

    /// Keys sharing `frequency`, oldest first.
    pub fn bucket(&self, frequency: u64) -> impl Iterator<Item = &K> + '_ {
        self.frequency_buckets
            .get(&frequency)
            .into_iter()
            .flat_map(move |bucket| self.arena.iter(&bucket.keys).map(|(_, key)| key))
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.frequency_buckets.len()
    }

    // == Internals ==
    /// Moves a key from its current bucket to the back of bucket `to`.
    ///
    /// No present bucket may lie strictly between the two frequencies.
    fn relocate(&mut self, key: &K, slot: FrequencySlot, to: u64) {
        let after = self.detach(slot.frequency, slot.node);
        self.attach(to, slot.node, after);
        if let Some(slot) = self.key_frequency.get_mut(key) {
            slot.frequency = to;
        }
    }

    /// Unlinks a node from its bucket, dropping the bucket once it is empty.
    ///
    /// Returns the present bucket now sitting just below `frequency + 1`:
    /// `frequency` itself if it survived, otherwise its lower neighbour.
    fn detach(&mut self, frequency: u64, node: NodeId) -> Option<u64> {
        let bucket = self.frequency_buckets.get_mut(&frequency)?;
        self.arena.unlink(&mut bucket.keys, node);
        if !bucket.keys.is_empty() {
            return Some(frequency);
        }

        let (prev, next) = (bucket.prev, bucket.next);
        if let Some(bucket) = self.frequency_buckets.remove(&frequency) {
            self.arena.release_list(bucket.keys);
        }
        if let Some(lower) = self.bucket_mut(prev) {
            lower.next = next;
        }
        if let Some(higher) = self.bucket_mut(next) {
            higher.prev = prev;
        }
        if self.min_frequency == Some(frequency) {
            self.min_frequency = next;
        }
        prev
    }

    /// Links a detached node at the back (most recent end) of a bucket,
    /// creating the bucket right above `after` when it is missing.
    fn attach(&mut self, frequency: u64, node: NodeId, after: Option<u64>) {
        if let Some(bucket) = self.frequency_buckets.get_mut(&frequency) {
            self.arena.link_back(&mut bucket.keys, node);
            return;
        }

        let next = match after {
            Some(lower) => self.frequency_buckets.get(&lower).and_then(|b| b.next),
            None => self.min_frequency,
        };
        let mut keys = self.arena.new_list();
        self.arena.link_back(&mut keys, node);
        self.frequency_buckets.insert(
            frequency,
            Bucket {
                keys,
                prev: after,
                next,
            },
        );

        match after {
            Some(_) => {
                if let Some(lower) = self.bucket_mut(after) {
                    lower.next = Some(frequency);
                }
            }
            None => self.min_frequency = Some(frequency),
        }
        if let Some(higher) = self.bucket_mut(next) {
            higher.prev = Some(frequency);
        }
    }

    fn bucket_mut(&mut self, frequency: Option<u64>) -> Option<&mut Bucket> {
        self.frequency_buckets.get_mut(&frequency?)
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let mut total = 0;
        for (&frequency, bucket) in &self.frequency_buckets {
            assert!(!bucket.keys.is_empty(), "empty bucket {} kept", frequency);
            for (id, key) in self.arena.iter(&bucket.keys) {
                let slot = self.key_frequency.get(key).expect("bucket key not tracked");
                assert_eq!(slot.frequency, frequency, "key filed under wrong bucket");
                assert_eq!(slot.node, id, "slot points at wrong node");
                total += 1;
            }
        }
        assert_eq!(total, self.key_frequency.len(), "orphaned keys");

        let lowest = self.frequency_buckets.keys().min().copied();
        assert_eq!(self.min_frequency, lowest, "min frequency out of date");

        // Chain visits every bucket in ascending order
        let mut visited = 0;
        let mut prev = None;
        let mut cursor = self.min_frequency;
        while let Some(frequency) = cursor {
            let bucket = &self.frequency_buckets[&frequency];
            assert_eq!(bucket.prev, prev, "broken back link at {}", frequency);
            if let Some(lower) = prev {
                assert!(lower < frequency, "chain out of order at {}", frequency);
            }
            visited += 1;
            prev = Some(frequency);
            cursor = bucket.next;
        }
        assert_eq!(visited, self.frequency_buckets.len(), "chain skips buckets");

        // Two sentinels per bucket plus one node per key
        assert_eq!(
            self.arena.live(),
            self.key_frequency.len() + 2 * self.frequency_buckets.len(),
            "leaked arena slots"
        );
    }
}

impl<K> EvictionIndex<K> for LfuIndex<K>
where
    K: Eq + Hash + Clone,
{
    // == Record Access ==
    /// Bumps a key's frequency and moves it to the back of the next bucket.
    ///
    /// A key at `u64::MAX` stays there; the access only refreshes its position
    /// within the saturated bucket.
    fn record_access(&mut self, key: &K) -> bool {
        let Some(slot) = self.key_frequency.get(key).copied() else {
            return false;
        };

        match slot.frequency.checked_add(1) {
            Some(next) => self.relocate(key, slot, next),
            None => {
                if let Some(bucket) = self.frequency_buckets.get_mut(&slot.frequency) {
                    self.arena.unlink(&mut bucket.keys, slot.node);
                    self.arena.link_back(&mut bucket.keys, slot.node);
                }
            }
        }
        true
    }

    // == Insert Fresh ==
    /// Adds a key with frequency 1 at the back of bucket 1.
    fn insert_fresh(&mut self, key: K) {
        if self.record_access(&key) {
            return;
        }
        let node = self.arena.alloc_detached(key.clone());
        self.attach(1, node, None);
        self.key_frequency.insert(key, FrequencySlot { frequency: 1, node });
    }

    // == Eviction Candidate ==
    /// Oldest key in the lowest-frequency bucket.
    fn eviction_candidate(&self) -> Option<&K> {
        let bucket = self.frequency_buckets.get(&self.min_frequency?)?;
        self.arena.front(&bucket.keys).and_then(|id| self.arena.key(id))
    }

    // == Remove ==
    /// Drops a key; the minimum moves to the next present bucket if needed.
    fn remove(&mut self, key: &K) -> bool {
        let Some(slot) = self.key_frequency.remove(key) else {
            return false;
        };
        self.detach(slot.frequency, slot.node);
        self.arena.free(slot.node);
        true
    }

    fn len(&self) -> usize {
        self.key_frequency.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.key_frequency.contains_key(key)
    }
}
