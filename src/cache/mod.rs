//! Cache Module
//!
//! Provides a capacity-bounded in-memory cache with LRU or LFU eviction.
//!
//! - `entry`: the key -> value store
//! - `lru` / `lfu`: eviction indexes, both built on the node arena in `arena`
//! - `store`: the [`Cache`] façade tying a store to one index

pub mod arena;
mod entry;
mod index;
mod lfu;
mod lru;
mod policy;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub(crate) use entry::EntryStore;
pub use index::{EvictionIndex, PolicyIndex};
pub use lfu::LfuIndex;
pub use lru::LruIndex;
pub use policy::Policy;
pub use stats::CacheStats;
pub use store::Cache;
