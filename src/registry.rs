//! Named façades side by side for comparative evaluation.
//!
//! A [`CacheRegistry`] owns several independent [`QueryCache`]s keyed by name
//! in a `BTreeMap`, so fan-out results always come back in name order. Every
//! fan-out call validates its input against all façades before touching any
//! of them, so a rejected `set` changes nothing anywhere.
//!
//! ## Example Usage
//!
//! ```rust
//! use plancache::registry::CacheRegistry;
//! use plancache::workload::Plan;
//!
//! let mut registry = CacheRegistry::standard_lineup(2, 7).unwrap();
//! assert_eq!(registry.len(), 13);
//!
//! let plan = |key: &String| Plan::new(format!("plan for {key}"), 4.0, 10.0);
//! let first = registry.execute("tpch__1".to_string(), &mut { plan }).unwrap();
//! assert!(first.values().all(|outcome| !outcome.hit));
//!
//! let second = registry.execute("tpch__1".to_string(), &mut { plan }).unwrap();
//! assert!(second.values().all(|outcome| outcome.hit && outcome.cost_incurred == 0.0));
//! ```

use std::collections::BTreeMap;
use std::hash::Hash;

use serde::Serialize;

use crate::cache::QueryCache;
use crate::error::{CacheError, Result, validate_capacity};
use crate::policy::StrategyKind;
use crate::stats::CacheStats;
use crate::traits::EvictionStrategy;
use crate::workload::PlanProducer;

/// Result of one read-through execution on one façade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<K> {
    /// The key was cached before the call.
    pub hit: bool,
    /// Key evicted to make room on a miss.
    pub evicted: Option<K>,
    /// Producer cost paid: `0.0` on a hit.
    pub cost_incurred: f64,
}

/// Name → façade mapping with fan-out operations.
#[derive(Debug)]
pub struct CacheRegistry<K, V> {
    caches: BTreeMap<String, QueryCache<K, V>>,
}

impl<K, V> CacheRegistry<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            caches: BTreeMap::new(),
        }
    }

    /// GDS, GDFS, LRU, LRU_2 … LRU_10 and RANDOM, each with `capacity`.
    ///
    /// `seed` fixes the RANDOM façade's victim sequence.
    pub fn standard_lineup(capacity: usize, seed: u64) -> Result<Self> {
        validate_capacity(capacity)?;
        let kinds = [StrategyKind::Gds, StrategyKind::Gdfs, StrategyKind::Lru]
            .into_iter()
            .chain((2..=10).map(StrategyKind::LruK))
            .chain([StrategyKind::Random]);

        let mut registry = Self::new();
        for kind in kinds {
            registry.register(kind.to_string(), QueryCache::with_seed(kind, capacity, seed)?)?;
        }
        Ok(registry)
    }

    /// Adds `cache` under `name`.
    pub fn register(&mut self, name: impl Into<String>, cache: QueryCache<K, V>) -> Result<()> {
        let name = name.into();
        if self.caches.contains_key(&name) {
            return Err(CacheError::DuplicateStrategy(name));
        }
        tracing::debug!(name = %name, strategy = %cache.kind(), "registered cache");
        self.caches.insert(name, cache);
        Ok(())
    }

    /// Removes and returns the façade under `name`.
    pub fn unregister(&mut self, name: &str) -> Result<QueryCache<K, V>> {
        self.caches
            .remove(name)
            .ok_or_else(|| CacheError::UnknownStrategy(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Result<&QueryCache<K, V>> {
        self.caches
            .get(name)
            .ok_or_else(|| CacheError::UnknownStrategy(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut QueryCache<K, V>> {
        self.caches
            .get_mut(name)
            .ok_or_else(|| CacheError::UnknownStrategy(name.to_string()))
    }

    /// Registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.caches.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryCache<K, V>)> {
        self.caches.iter().map(|(name, cache)| (name.as_str(), cache))
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    /// Looks `key` up in every façade; `Some` marks a hit.
    pub fn try_get(&mut self, key: &K) -> BTreeMap<String, Option<V>> {
        self.caches
            .iter_mut()
            .map(|(name, cache)| (name.clone(), cache.try_get(key).cloned()))
            .collect()
    }

    /// Sets `key` in every façade, returning each façade's evicted key.
    ///
    /// `cost` and `size` are checked against every façade first; on error no
    /// façade is modified.
    pub fn set(
        &mut self,
        key: K,
        value: V,
        cost: f64,
        size: f64,
    ) -> Result<BTreeMap<String, Option<K>>> {
        self.validate_entry(&key, cost, size)?;
        let mut evicted = BTreeMap::new();
        for (name, cache) in &mut self.caches {
            let victim = cache.set(key.clone(), value.clone(), cost, size)?;
            evicted.insert(name.clone(), victim);
        }
        Ok(evicted)
    }

    /// Read-through lookup on every façade.
    ///
    /// The producer is asked for the plan at most once, and only if some
    /// façade misses. Each missing façade then stores the plan and reports
    /// the producer's cost as incurred.
    pub fn execute<P>(&mut self, key: K, producer: &mut P) -> Result<BTreeMap<String, Outcome<K>>>
    where
        P: PlanProducer<K, V> + ?Sized,
    {
        let needs_plan = self.caches.values().any(|cache| !cache.has(&key));
        let plan = if needs_plan {
            let plan = producer.produce(&key);
            self.validate_entry(&key, plan.cost, plan.size)?;
            Some(plan)
        } else {
            None
        };

        let mut outcomes = BTreeMap::new();
        for (name, cache) in &mut self.caches {
            let hit = cache.try_get(&key).is_some();
            let outcome = match (&plan, hit) {
                (Some(plan), false) => Outcome {
                    hit: false,
                    evicted: cache.set(key.clone(), plan.value.clone(), plan.cost, plan.size)?,
                    cost_incurred: plan.cost,
                },
                _ => Outcome {
                    hit: true,
                    evicted: None,
                    cost_incurred: 0.0,
                },
            };
            outcomes.insert(name.clone(), outcome);
        }
        Ok(outcomes)
    }

    /// Resizes every façade; zero is rejected before any façade changes.
    pub fn resize_all(&mut self, capacity: usize) -> Result<BTreeMap<String, Vec<K>>> {
        validate_capacity(capacity)?;
        let mut evicted = BTreeMap::new();
        for (name, cache) in &mut self.caches {
            evicted.insert(name.clone(), cache.resize(capacity)?);
        }
        Ok(evicted)
    }

    pub fn clear_all(&mut self) {
        for cache in self.caches.values_mut() {
            cache.clear();
        }
    }

    pub fn dump_all(&self) -> BTreeMap<String, Vec<(K, V)>> {
        self.caches
            .iter()
            .map(|(name, cache)| (name.clone(), cache.dump()))
            .collect()
    }

    pub fn stats(&self) -> BTreeMap<String, CacheStats> {
        self.caches
            .iter()
            .map(|(name, cache)| (name.clone(), cache.stats()))
            .collect()
    }

    fn validate_entry(&self, key: &K, cost: f64, size: f64) -> Result<()> {
        self.caches
            .values()
            .try_for_each(|cache| cache.strategy().validate_entry(key, cost, size))
    }
}

impl<K, V> Default for CacheRegistry<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
