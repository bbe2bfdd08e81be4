//! Error types for the cache
//!
//! Provides unified error handling using thiserror.
//!
//! A lookup miss is not an error: `get` returns `Option`.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must be strictly positive
    #[error("Invalid capacity: {0} (must be greater than zero)")]
    InvalidCapacity(i64),

    /// Unknown eviction policy name
    #[error("Invalid policy: {0} (expected \"lru\" or \"lfu\")")]
    InvalidPolicy(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
