//! Query cache façade.
//!
//! [`QueryCache`] owns exactly one [`Strategy`] and exposes the
//! [`EvictionStrategy`] contract on top of it, adding hit/miss counters and
//! live reconfiguration.
//!
//! ## Architecture
//!
//! ```text
//!   caller ──try_get/set──► QueryCache ──► Strategy::{Lru | LruK | Gds | Gdfs | Random}
//!                             │  stats: CacheStats
//!                             │  seed:  Option<u64>   (reused by Random on replace)
//!                             │
//!   replace_strategy(kind, capacity)
//!       1. validate kind + capacity      (error → nothing changes)
//!       2. build fresh strategy
//!       3. drop old strategy and its entries, reset stats
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use plancache::cache::QueryCache;
//! use plancache::policy::StrategyKind;
//! use plancache::traits::EvictionStrategy;
//!
//! let mut cache = QueryCache::try_new(StrategyKind::Lru, 2).unwrap();
//! cache.set("tpch__1", "plan-1", 12.0, 40.0).unwrap();
//! assert!(cache.try_get(&"tpch__1").is_some());
//! assert!(cache.try_get(&"tpch__2").is_none());
//! assert_eq!(cache.stats().hit_rate(), 0.5);
//!
//! // Swapping the strategy discards contents
//! cache.replace_strategy(StrategyKind::Gdfs, 4).unwrap();
//! assert!(cache.is_empty());
//! assert_eq!(cache.name(), "GDFS");
//! ```

use std::hash::Hash;

use crate::config::CacheConfig;
use crate::error::Result;
use crate::policy::{Strategy, StrategyKind};
use crate::stats::CacheStats;
use crate::traits::EvictionStrategy;

/// Stable-API wrapper around one swappable strategy.
#[derive(Debug)]
pub struct QueryCache<K, V> {
    strategy: Strategy<K, V>,
    stats: CacheStats,
    seed: Option<u64>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a façade running `kind` with `capacity`.
    pub fn try_new(kind: StrategyKind, capacity: usize) -> Result<Self> {
        Self::build(kind, capacity, None)
    }

    /// Like [`try_new`](Self::try_new), seeding Random strategies with `seed`.
    pub fn with_seed(kind: StrategyKind, capacity: usize, seed: u64) -> Result<Self> {
        Self::build(kind, capacity, Some(seed))
    }

    /// Creates a façade from a validated configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Self::try_new(config.strategy, config.capacity)
    }

    fn build(kind: StrategyKind, capacity: usize, seed: Option<u64>) -> Result<Self> {
        Ok(Self {
            strategy: Strategy::build_with_seed(kind, capacity, seed)?,
            stats: CacheStats::default(),
            seed,
        })
    }

    /// The active strategy, for strategy-specific accessors.
    pub fn strategy(&self) -> &Strategy<K, V> {
        &self.strategy
    }

    /// Counters since construction, the last replacement or the last reset.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    /// Installs a fresh `kind` strategy with `capacity`, discarding all entries.
    ///
    /// On error the current strategy and its contents are kept.
    pub fn replace_strategy(&mut self, kind: StrategyKind, capacity: usize) -> Result<()> {
        let fresh = Strategy::build_with_seed(kind, capacity, self.seed)?;
        let previous = std::mem::replace(&mut self.strategy, fresh);
        tracing::info!(
            from = %previous.kind(),
            to = %kind,
            capacity,
            discarded = previous.len(),
            "replaced cache strategy"
        );
        self.stats = CacheStats::default();
        Ok(())
    }

    /// Applies a live configuration update.
    ///
    /// A different strategy triggers [`replace_strategy`](Self::replace_strategy)
    /// (contents discarded, nothing reported as evicted); otherwise a different
    /// capacity triggers [`resize`](EvictionStrategy::resize) and the evicted
    /// keys are returned.
    pub fn apply_config(&mut self, config: &CacheConfig) -> Result<Vec<K>> {
        config.validate()?;
        if config.strategy != self.strategy.kind() {
            self.replace_strategy(config.strategy, config.capacity)?;
            return Ok(Vec::new());
        }
        self.resize(config.capacity)
    }

    /// Current configuration of this façade.
    pub fn config(&self) -> CacheConfig {
        CacheConfig::new(self.strategy.capacity(), self.strategy.kind())
    }
}

impl<K, V> EvictionStrategy<K, V> for QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn try_get(&mut self, key: &K) -> Option<&V> {
        let value = self.strategy.try_get(key);
        self.stats.record_lookup(value.is_some());
        value
    }

    fn set(&mut self, key: K, value: V, cost: f64, size: f64) -> Result<Option<K>> {
        let updated = self.strategy.has(&key);
        let evicted = self.strategy.set(key, value, cost, size)?;
        self.stats.record_set(updated, evicted.is_some());
        Ok(evicted)
    }

    fn has(&self, key: &K) -> bool {
        self.strategy.has(key)
    }

    fn remove(&mut self, key: &K) -> bool {
        let removed = self.strategy.remove(key);
        if removed {
            self.stats.removals += 1;
        }
        removed
    }

    fn evict(&mut self) -> Option<K> {
        let victim = self.strategy.evict();
        if victim.is_some() {
            self.stats.evictions += 1;
        }
        victim
    }

    fn resize(&mut self, new_capacity: usize) -> Result<Vec<K>> {
        let victims = self.strategy.resize(new_capacity)?;
        self.stats.evictions += victims.len() as u64;
        Ok(victims)
    }

    fn clear(&mut self) {
        self.strategy.clear();
    }

    fn dump(&self) -> Vec<(K, V)> {
        self.strategy.dump()
    }

    fn len(&self) -> usize {
        self.strategy.len()
    }

    fn capacity(&self) -> usize {
        self.strategy.capacity()
    }

    fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    fn lru(capacity: usize) -> QueryCache<&'static str, u32> {
        QueryCache::try_new(StrategyKind::Lru, capacity).unwrap()
    }

    mod delegation {
        use super::*;

        #[test]
        fn set_reports_evicted_key() {
            let mut cache = lru(1);
            assert_eq!(cache.set("a", 1, 0.0, 1.0).unwrap(), None);
            assert_eq!(cache.set("b", 2, 0.0, 1.0).unwrap(), Some("a"));
            assert_eq!(cache.dump(), vec![("b", 2)]);
        }

        #[test]
        fn strategy_errors_surface_unchanged() {
            let mut cache = QueryCache::try_new(StrategyKind::Gds, 2).unwrap();
            let err = cache.set("a", 1u8, 1.0, 0.0).unwrap_err();
            assert!(matches!(err, CacheError::InvalidConfiguration(_)));
            assert!(cache.is_empty());
            assert_eq!(cache.stats(), CacheStats::default());
        }

        #[test]
        fn stats_track_every_operation() {
            let mut cache = lru(2);
            cache.set("a", 1, 0.0, 1.0).unwrap();
            cache.set("a", 2, 0.0, 1.0).unwrap();
            cache.set("b", 3, 0.0, 1.0).unwrap();
            cache.set("c", 4, 0.0, 1.0).unwrap();
            cache.try_get(&"c");
            cache.try_get(&"a");
            cache.remove(&"c");

            let stats = cache.stats();
            assert_eq!(stats.inserts, 3);
            assert_eq!(stats.updates, 1);
            assert_eq!(stats.evictions, 1);
            assert_eq!(stats.hits, 1);
            assert_eq!(stats.misses, 1);
            assert_eq!(stats.removals, 1);

            cache.reset_stats();
            assert_eq!(cache.stats(), CacheStats::default());
        }

        #[test]
        fn resize_counts_evictions() {
            let mut cache = lru(4);
            for key in ["a", "b", "c", "d"] {
                cache.set(key, 0, 0.0, 1.0).unwrap();
            }
            assert_eq!(cache.resize(1).unwrap(), vec!["a", "b", "c"]);
            assert_eq!(cache.stats().evictions, 3);
            assert!(cache.resize(0).is_err());
            assert_eq!(cache.capacity(), 1);
        }
    }

    mod replacement {
        use super::*;

        #[test]
        fn replace_discards_contents_and_stats() {
            let mut cache = lru(2);
            cache.set("a", 1, 0.0, 1.0).unwrap();
            cache.try_get(&"a");
            cache.replace_strategy(StrategyKind::LruK(3), 5).unwrap();
            assert!(cache.is_empty());
            assert_eq!(cache.capacity(), 5);
            assert_eq!(cache.kind(), StrategyKind::LruK(3));
            assert_eq!(cache.stats(), CacheStats::default());
        }

        #[test]
        fn failed_replace_keeps_everything() {
            let mut cache = lru(2);
            cache.set("a", 1, 0.0, 1.0).unwrap();
            assert!(cache.replace_strategy(StrategyKind::Gds, 0).is_err());
            assert!(cache.replace_strategy(StrategyKind::LruK(0), 3).is_err());
            assert_eq!(cache.kind(), StrategyKind::Lru);
            assert!(cache.has(&"a"));
        }

        #[test]
        fn apply_config_resizes_same_strategy() {
            let mut cache = lru(3);
            for key in ["a", "b", "c"] {
                cache.set(key, 0, 0.0, 1.0).unwrap();
            }
            let evicted = cache.apply_config(&CacheConfig::new(1, StrategyKind::Lru)).unwrap();
            assert_eq!(evicted, vec!["a", "b"]);
            assert_eq!(cache.config(), CacheConfig::new(1, StrategyKind::Lru));
        }

        #[test]
        fn apply_config_replaces_other_strategy() {
            let mut cache = lru(3);
            cache.set("a", 0, 0.0, 1.0).unwrap();
            let evicted = cache.apply_config(&CacheConfig::new(3, StrategyKind::Random)).unwrap();
            assert!(evicted.is_empty());
            assert!(cache.is_empty());
            assert_eq!(cache.name(), "RANDOM");
        }

        #[test]
        fn apply_config_rejects_invalid_without_change() {
            let mut cache = lru(3);
            cache.set("a", 0, 0.0, 1.0).unwrap();
            assert!(cache.apply_config(&CacheConfig::new(0, StrategyKind::Gds)).is_err());
            assert_eq!(cache.config(), CacheConfig::new(3, StrategyKind::Lru));
            assert!(cache.has(&"a"));
        }

        #[test]
        fn from_config_builds_requested_strategy() {
            let cache: QueryCache<u64, String> =
                QueryCache::from_config(&CacheConfig::default()).unwrap();
            assert_eq!(cache.kind(), StrategyKind::Gdfs);
            assert_eq!(cache.capacity(), crate::config::DEFAULT_CAPACITY);
        }
    }
}
