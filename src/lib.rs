//! Policy Cache - a capacity-bounded in-memory cache
//!
//! Keys are evicted by Least Recently Used or Least Frequently Used order,
//! both with O(1) amortized `get` and `put`.
//!
//! ```
//! use policy_cache::{Cache, Policy};
//!
//! let mut cache = Cache::new(2, Policy::Lfu);
//! cache.put(1, "a");
//! cache.put(2, "b");
//! cache.get(&1);
//! cache.put(3, "c"); // evicts 2, the least frequently used
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.get(&1), Some(&"a"));
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod replay;
pub mod shared;

pub use cache::{Cache, CacheStats, Policy};
pub use config::Config;
pub use error::{CacheError, Result};
pub use shared::SharedCache;
