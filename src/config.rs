//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;

use serde::{Deserialize, Serialize};

use crate::cache::Policy;

/// Cache configuration parameters.
///
/// Capacity is signed so that a negative value coming from the environment or
/// a config file reaches the checked constructor and is rejected there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: i64,
    /// Eviction policy
    #[serde(default)]
    pub policy: Policy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_POLICY` - `lru` or `lfu` (default: lru)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.capacity),
            policy: env::var("CACHE_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.policy),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            policy: Policy::Lru,
        }
    }
}
