//! Property-Based Tests for Cache Module
//!
//! Uses proptest to drive both policies with random operation sequences and
//! compare them against naive reference models.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::{Cache, CacheStats, Policy};

// == Test Configuration ==
const KEY_SPACE: u8 = 12;

// == Strategies ==
/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: u8, value: u32 },
    Get { key: u8 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (0..KEY_SPACE, any::<u32>()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        (0..KEY_SPACE).prop_map(|key| CacheOp::Get { key }),
    ]
}

fn policy_strategy() -> impl Strategy<Value = Policy> {
    prop_oneof![Just(Policy::Lru), Just(Policy::Lfu)]
}

// == Reference Model ==
/// O(n) cache that picks its victim by scanning every entry.
///
/// Each entry remembers the tick of its last access. LRU evicts the smallest
/// tick; LFU evicts the smallest (frequency, tick) pair, since a key's place
/// inside its frequency bucket is the moment it last moved there.
struct ModelCache {
    policy: Policy,
    capacity: usize,
    clock: u64,
    entries: HashMap<u8, ModelEntry>,
    stats: CacheStats,
}

struct ModelEntry {
    value: u32,
    frequency: u64,
    touched: u64,
}

impl ModelCache {
    fn new(capacity: usize, policy: Policy) -> Self {
        Self {
            policy,
            capacity,
            clock: 0,
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let now = self.tick();
        let Some(entry) = self.entries.get_mut(&key) else {
            self.stats.misses += 1;
            return None;
        };
        entry.frequency += 1;
        entry.touched = now;
        self.stats.hits += 1;
        Some(entry.value)
    }

    fn put(&mut self, key: u8, value: u32) -> Option<u8> {
        if self.capacity == 0 {
            return None;
        }
        let now = self.tick();
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            entry.frequency += 1;
            entry.touched = now;
            self.stats.updates += 1;
            return None;
        }

        let mut evicted = None;
        if self.entries.len() >= self.capacity {
            let policy = self.policy;
            evicted = self
                .entries
                .iter()
                .min_by_key(|(_, e)| match policy {
                    Policy::Lru => (0, e.touched),
                    Policy::Lfu => (e.frequency, e.touched),
                })
                .map(|(k, _)| *k);
            if let Some(victim) = evicted {
                self.entries.remove(&victim);
                self.stats.evictions += 1;
            }
        }
        self.entries.insert(
            key,
            ModelEntry {
                value,
                frequency: 1,
                touched: now,
            },
        );
        self.stats.insertions += 1;
        evicted
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // *For any* sequence of operations, the cache size SHALL never exceed
    // capacity and store/index SHALL stay in one-to-one correspondence.
    #[test]
    fn prop_invariants_hold_after_every_call(
        policy in policy_strategy(),
        capacity in 0usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..200)
    ) {
        let mut cache = Cache::new(capacity, policy);

        for op in ops {
            match op {
                CacheOp::Put { key, value } => cache.put(key, value),
                CacheOp::Get { key } => {
                    cache.get(&key);
                }
            }
            prop_assert!(cache.len() <= capacity);
            cache.check_invariants();
        }
    }

    // *For any* sequence of operations, every `get` SHALL agree with the
    // reference model, which implies the same victim on every eviction, and
    // the statistics SHALL count the same hits, misses, writes and evictions.
    #[test]
    fn prop_matches_reference_model(
        policy in policy_strategy(),
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..300)
    ) {
        let mut cache = Cache::new(capacity, policy);
        let mut model = ModelCache::new(capacity, policy);

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    let evicted = model.put(key, value);
                    cache.put(key, value);
                    if let Some(victim) = evicted {
                        prop_assert!(
                            !cache.contains(&victim),
                            "{} should have evicted key {}", policy, victim
                        );
                    }
                }
                CacheOp::Get { key } => {
                    let expected = model.get(key);
                    prop_assert_eq!(cache.get(&key).copied(), expected);
                }
            }
            prop_assert_eq!(cache.len(), model.entries.len());
            if policy == Policy::Lfu {
                for (key, entry) in &model.entries {
                    prop_assert_eq!(cache.frequency(key), Some(entry.frequency));
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, model.stats.hits);
        prop_assert_eq!(stats.misses, model.stats.misses);
        prop_assert_eq!(stats.insertions, model.stats.insertions);
        prop_assert_eq!(stats.updates, model.stats.updates);
        prop_assert_eq!(stats.evictions, model.stats.evictions);
        prop_assert_eq!(stats.total_entries, model.entries.len());
    }

    // *For any* set of distinct keys filling the cache, inserting one more
    // key with no intervening access SHALL evict the first key inserted.
    #[test]
    fn prop_first_inserted_is_evicted(
        policy in policy_strategy(),
        keys in prop::collection::hash_set(any::<u16>(), 2..20)
    ) {
        let keys: Vec<u16> = keys.into_iter().collect();
        let (extra, fill) = keys.split_last().unwrap();
        let mut cache = Cache::new(fill.len(), policy);

        for key in fill {
            cache.put(*key, ());
        }
        cache.put(*extra, ());

        prop_assert!(!cache.contains(&fill[0]));
        for key in &fill[1..] {
            prop_assert!(cache.contains(key));
        }
        prop_assert!(cache.contains(extra));
    }

    // *For any* key read repeatedly under LFU, its frequency SHALL grow by one
    // per read, and it SHALL outlive every key read fewer times.
    #[test]
    fn prop_lfu_repeated_reads_protect_key(reads in 1usize..20, others in 2u32..8) {
        let mut cache = Cache::new(others as usize, Policy::Lfu);
        for key in 0..others {
            cache.put(key, key);
        }

        for i in 0..reads {
            cache.get(&0);
            prop_assert_eq!(cache.frequency(&0), Some(2 + i as u64));
        }

        // Push in enough fresh keys to cycle every other slot
        for key in others..others * 3 {
            cache.put(key, key);
        }
        prop_assert!(cache.contains(&0));
    }
}
