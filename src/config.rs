//! Runtime cache configuration.
//!
//! [`CacheConfig`] is what an outer layer (CLI, settings file, admin command)
//! hands to [`QueryCache::apply_config`](crate::cache::QueryCache::apply_config).
//! A capacity change resizes the live strategy; a strategy change replaces it
//! and discards its contents.
//!
//! ## Example
//!
//! ```rust
//! use plancache::config::CacheConfig;
//! use plancache::policy::StrategyKind;
//!
//! let config: CacheConfig =
//!     serde_json::from_str(r#"{ "capacity": 64, "strategy": "lru-k(3)" }"#).unwrap();
//! assert_eq!(config.strategy, StrategyKind::LruK(3));
//! config.validate().unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, validate_capacity};
use crate::policy::StrategyKind;

/// Default number of cached plans.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Capacity and strategy for one façade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of live entries; must be positive.
    pub capacity: usize,
    /// Eviction strategy.
    pub strategy: StrategyKind,
}

impl CacheConfig {
    pub fn new(capacity: usize, strategy: StrategyKind) -> Self {
        Self { capacity, strategy }
    }

    /// Rejects a zero capacity or an unbuildable strategy.
    pub fn validate(&self) -> Result<()> {
        validate_capacity(self.capacity)?;
        self.strategy.validate()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            strategy: StrategyKind::Gdfs,
        }
    }
}
