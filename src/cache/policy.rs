//! Eviction Policy Module
//!
//! Names the eviction strategies a cache can be built with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

// == Policy ==
/// Eviction strategy used when an insert would exceed capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Least Recently Used: evicts the entry untouched for the longest time.
    #[default]
    Lru,
    /// Least Frequently Used: evicts the entry with the lowest access count,
    /// oldest first among equal counts.
    Lfu,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Lru => f.write_str("lru"),
            Policy::Lfu => f.write_str("lfu"),
        }
    }
}

impl FromStr for Policy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(Policy::Lru),
            "lfu" => Ok(Policy::Lfu),
            other => Err(CacheError::InvalidPolicy(other.to_string())),
        }
    }
}
