//! Thread-safe query cache.
//!
//! [`ConcurrentQueryCache`] wraps a [`QueryCache`] in an `Arc<RwLock<_>>`.
//! Every strategy updates its bookkeeping on a hit (recency, history,
//! priority), so lookups take the **write lock** as well; only `has`, `len`,
//! `capacity`, `dump`, `stats`, `config` and [`read`](ConcurrentQueryCache::read)
//! share a read lock. Clones share the same underlying cache.
//!
//! ## Example
//!
//! ```
//! use std::thread;
//!
//! use plancache::concurrent::ConcurrentQueryCache;
//! use plancache::policy::StrategyKind;
//!
//! let cache = ConcurrentQueryCache::try_new(StrategyKind::Lru, 64).unwrap();
//! let handles: Vec<_> = (0..4u64)
//!     .map(|t| {
//!         let cache = cache.clone();
//!         thread::spawn(move || {
//!             cache.set(t, format!("plan-{t}"), 1.0, 1.0).unwrap();
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 4);
//! assert_eq!(cache.try_get(&2), Some("plan-2".to_string()));
//! ```

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::cache::QueryCache;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::policy::StrategyKind;
use crate::stats::CacheStats;
use crate::traits::{ConcurrentCache, EvictionStrategy};
use crate::workload::PlanProducer;

/// Shared, lock-protected [`QueryCache`].
#[derive(Debug)]
pub struct ConcurrentQueryCache<K, V> {
    inner: Arc<RwLock<QueryCache<K, V>>>,
}

impl<K, V> Clone for ConcurrentQueryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> ConcurrentQueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn try_new(kind: StrategyKind, capacity: usize) -> Result<Self> {
        QueryCache::try_new(kind, capacity).map(Self::from_cache)
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        QueryCache::from_config(config).map(Self::from_cache)
    }

    /// Wraps an existing façade.
    pub fn from_cache(cache: QueryCache<K, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }

    /// Looks up `key`, returning a clone of the plan on a hit.
    pub fn try_get(&self, key: &K) -> Option<V> {
        self.inner.write().try_get(key).cloned()
    }

    /// Looks up `key` and applies `f` to the plan inside the lock.
    pub fn try_get_with<F, R>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        self.inner.write().try_get(key).map(f)
    }

    pub fn set(&self, key: K, value: V, cost: f64, size: f64) -> Result<Option<K>> {
        self.inner.write().set(key, value, cost, size)
    }

    /// Read-through lookup under a single write lock.
    ///
    /// On a miss the producer runs while the lock is held, so concurrent
    /// callers for the same key plan it once.
    pub fn get_or_produce<P>(&self, key: K, producer: &mut P) -> Result<V>
    where
        P: PlanProducer<K, V> + ?Sized,
    {
        let mut cache = self.inner.write();
        if let Some(value) = cache.try_get(&key) {
            return Ok(value.clone());
        }
        let plan = producer.produce(&key);
        cache.set(key, plan.value.clone(), plan.cost, plan.size)?;
        Ok(plan.value)
    }

    pub fn has(&self, key: &K) -> bool {
        self.inner.read().has(key)
    }

    pub fn remove(&self, key: &K) -> bool {
        self.inner.write().remove(key)
    }

    pub fn evict(&self) -> Option<K> {
        self.inner.write().evict()
    }

    pub fn resize(&self, capacity: usize) -> Result<Vec<K>> {
        self.inner.write().resize(capacity)
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn dump(&self) -> Vec<(K, V)> {
        self.inner.read().dump()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    pub fn kind(&self) -> StrategyKind {
        self.inner.read().kind()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.read().stats()
    }

    pub fn reset_stats(&self) {
        self.inner.write().reset_stats();
    }

    pub fn config(&self) -> CacheConfig {
        self.inner.read().config()
    }

    pub fn replace_strategy(&self, kind: StrategyKind, capacity: usize) -> Result<()> {
        self.inner.write().replace_strategy(kind, capacity)
    }

    pub fn apply_config(&self, config: &CacheConfig) -> Result<Vec<K>> {
        self.inner.write().apply_config(config)
    }

    /// Runs `f` with shared access to the façade.
    pub fn read<R>(&self, f: impl FnOnce(&QueryCache<K, V>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access, for multi-step updates that must not
    /// interleave with other callers.
    pub fn write<R>(&self, f: impl FnOnce(&mut QueryCache<K, V>) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl<K, V> ConcurrentCache for ConcurrentQueryCache<K, V>
where
    K: Send + Sync,
    V: Send + Sync,
{
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;
    use crate::workload::Plan;

    fn assert_concurrent<T: ConcurrentCache>() {}

    #[test]
    fn is_send_and_sync() {
        assert_concurrent::<ConcurrentQueryCache<String, Vec<u8>>>();
    }

    #[test]
    fn basic_operations() {
        let cache = ConcurrentQueryCache::try_new(StrategyKind::Gdfs, 4).unwrap();
        assert_eq!(cache.set("q".to_string(), 1u32, 2.0, 3.0).unwrap(), None);
        assert!(cache.has(&"q".to_string()));
        assert_eq!(cache.try_get(&"q".to_string()), Some(1));
        assert_eq!(cache.try_get_with(&"q".to_string(), |v| v * 10), Some(10));
        assert_eq!(cache.stats().hits, 2);
        assert!(cache.remove(&"q".to_string()));
        assert!(cache.is_empty());
        assert!(cache.set("bad".to_string(), 1, 1.0, 0.0).is_err());
    }

    #[test]
    fn reconfiguration_through_shared_handle() {
        let cache = ConcurrentQueryCache::try_new(StrategyKind::Lru, 3).unwrap();
        let other = cache.clone();
        for key in 0..3u8 {
            cache.set(key, key, 0.0, 1.0).unwrap();
        }
        assert_eq!(other.resize(1).unwrap(), vec![0, 1]);
        assert_eq!(cache.capacity(), 1);

        other.replace_strategy(StrategyKind::Random, 2).unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.kind(), StrategyKind::Random);
        assert_eq!(cache.config(), CacheConfig::new(2, StrategyKind::Random));
    }

    #[test]
    fn get_or_produce_plans_once_per_key() {
        let cache = ConcurrentQueryCache::try_new(StrategyKind::LruK(2), 16).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    let mut producer = |key: &u32| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Plan::new(*key * 2, 1.0, 1.0)
                    };
                    for key in 0..4u32 {
                        assert_eq!(cache.get_or_produce(key, &mut producer).unwrap(), key * 2);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn parallel_writers_respect_capacity() {
        let cache = ConcurrentQueryCache::try_new(StrategyKind::Gds, 32).unwrap();
        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..200u64 {
                        let key = t * 1000 + i;
                        cache.set(key, i, (i % 7) as f64, 1.0 + (i % 3) as f64).unwrap();
                        cache.try_get(&(t * 1000 + i / 2));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 32);
        let stats = cache.stats();
        assert_eq!(stats.inserts, 800);
        assert_eq!(stats.evictions, 800 - 32);
        cache.read(|inner| assert!(inner.len() <= inner.capacity()));
    }

    #[test]
    fn write_closure_is_atomic() {
        let cache = ConcurrentQueryCache::try_new(StrategyKind::Lru, 2).unwrap();
        let evicted = cache.write(|inner| {
            inner.set("a", 1, 0.0, 1.0)?;
            inner.set("b", 2, 0.0, 1.0)?;
            inner.set("c", 3, 0.0, 1.0)
        });
        assert_eq!(evicted.unwrap(), Some("a"));
    }
}
