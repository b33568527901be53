//! Random replacement strategy.
//!
//! Victims are drawn uniformly among live entries. Accesses carry no
//! bookkeeping, which makes this the baseline the other strategies are
//! compared against.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                      RandomCache<K, V, R> Layout                            │
//! │                                                                             │
//! │   EntryStore<K, V, usize>               keys: Vec<K>                        │
//! │   key → Entry { value, .., meta: idx }  dense array of keys                 │
//! │                                                                             │
//! │   ┌──────────┬──────────────┐          ┌─────┬─────┬─────┬─────┐           │
//! │   │   Key    │ idx          │          │  0  │  1  │  2  │  3  │           │
//! │   ├──────────┼──────────────┤          ├─────┼─────┼─────┼─────┤           │
//! │   │  "q1"    │ 0            │────┐     │ q1  │ q2  │ q3  │ q4  │           │
//! │   │  "q2"    │ 1            │────┼────►└─────┴─────┴─────┴─────┘           │
//! │   │  "q3"    │ 2            │────┘                                         │
//! │   └──────────┴──────────────┘                                              │
//! │                                                                             │
//! │   Eviction: i = rng.gen_range(0..len), swap keys[i] with the last key,      │
//! │   patch the moved key's idx, pop. Removal by key uses the same swap.        │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Randomness
//!
//! The RNG is a type parameter. [`RandomCache::try_new`] seeds a [`SmallRng`]
//! from OS entropy, [`RandomCache::with_seed`] makes runs reproducible and
//! [`RandomCache::with_rng`] accepts any [`Rng`].
//!
//! ## Example Usage
//!
//! ```
//! use plancache::policy::random::RandomCache;
//! use plancache::traits::EvictionStrategy;
//!
//! let mut cache = RandomCache::with_seed(2, 42).unwrap();
//! cache.set("a", 1, 0.0, 1.0).unwrap();
//! cache.set("b", 2, 0.0, 1.0).unwrap();
//!
//! let victim = cache.set("c", 3, 0.0, 1.0).unwrap().unwrap();
//! assert!(victim == "a" || victim == "b");
//! assert_eq!(cache.len(), 2);
//! assert!(cache.has(&"c"));
//! ```

use std::hash::Hash;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, validate_capacity};
use crate::policy::StrategyKind;
use crate::store::{Entry, EntryStore};
use crate::traits::{EvictionStrategy, shrink_to};

/// Uniform random eviction over a dense key vector.
pub struct RandomCache<K, V, R = SmallRng> {
    store: EntryStore<K, V, usize>,
    keys: Vec<K>,
    capacity: usize,
    rng: R,
}

impl<K, V> RandomCache<K, V, SmallRng>
where
    K: Eq + Hash + Clone,
{
    /// Creates a random cache seeded from OS entropy.
    pub fn try_new(capacity: usize) -> Result<Self> {
        Self::with_rng(capacity, SmallRng::from_entropy())
    }

    /// Creates a random cache whose victim sequence is fixed by `seed`.
    pub fn with_seed(capacity: usize, seed: u64) -> Result<Self> {
        Self::with_rng(capacity, SmallRng::seed_from_u64(seed))
    }
}

impl<K, V, R> RandomCache<K, V, R>
where
    K: Eq + Hash + Clone,
    R: Rng,
{
    /// Creates a random cache drawing victims from `rng`.
    pub fn with_rng(capacity: usize, rng: R) -> Result<Self> {
        validate_capacity(capacity)?;
        Ok(Self {
            store: EntryStore::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
            capacity,
            rng,
        })
    }

    /// Removes the key at dense position `idx` with swap-remove.
    fn take_at(&mut self, idx: usize) -> Option<K> {
        if idx >= self.keys.len() {
            return None;
        }
        let victim = self.keys.swap_remove(idx);
        if let Some(moved) = self.keys.get(idx) {
            if let Some(entry) = self.store.get_mut(moved) {
                entry.meta = idx;
            }
        }
        self.store.remove(&victim);
        Some(victim)
    }

    /// Validates internal invariants (debug-only).
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> std::result::Result<(), crate::error::InvariantError> {
        use crate::error::InvariantError;

        if self.store.len() != self.keys.len() {
            return Err(InvariantError::new(format!(
                "store holds {} entries but key vector holds {}",
                self.store.len(),
                self.keys.len()
            )));
        }
        for (idx, key) in self.keys.iter().enumerate() {
            match self.store.get(key) {
                Some(entry) if entry.meta == idx => {},
                Some(entry) => {
                    return Err(InvariantError::new(format!(
                        "key at position {idx} records position {}",
                        entry.meta
                    )));
                },
                None => return Err(InvariantError::new("key vector holds a dead key")),
            }
        }
        Ok(())
    }
}

impl<K, V, R> EvictionStrategy<K, V> for RandomCache<K, V, R>
where
    K: Eq + Hash + Clone,
    V: Clone,
    R: Rng,
{
    fn try_get(&mut self, key: &K) -> Option<&V> {
        self.store.get(key).map(|entry| &entry.value)
    }

    fn set(&mut self, key: K, value: V, cost: f64, size: f64) -> Result<Option<K>> {
        if let Some(entry) = self.store.get_mut(&key) {
            entry.value = value;
            entry.cost = cost;
            entry.size = size;
            return Ok(None);
        }

        let evicted = if self.store.len() >= self.capacity {
            self.evict()
        } else {
            None
        };
        let idx = self.keys.len();
        self.keys.push(key.clone());
        self.store.insert(key, Entry::new(value, cost, size, idx));
        Ok(evicted)
    }

    fn has(&self, key: &K) -> bool {
        self.store.contains(key)
    }

    fn remove(&mut self, key: &K) -> bool {
        match self.store.get(key) {
            Some(entry) => {
                let idx = entry.meta;
                self.take_at(idx).is_some()
            },
            None => false,
        }
    }

    fn evict(&mut self) -> Option<K> {
        if self.keys.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..self.keys.len());
        let victim = self.take_at(idx)?;
        tracing::debug!(strategy = "RANDOM", slot = idx, len = self.keys.len(), "evicted entry");
        Some(victim)
    }

    fn resize(&mut self, new_capacity: usize) -> Result<Vec<K>> {
        validate_capacity(new_capacity)?;
        if new_capacity == self.capacity {
            return Ok(Vec::new());
        }
        let len = self.keys.len();
        let victims = shrink_to(len, new_capacity, || self.evict());
        tracing::info!(
            strategy = "RANDOM",
            from = self.capacity,
            to = new_capacity,
            evicted = victims.len(),
            "resized cache"
        );
        self.capacity = new_capacity;
        Ok(victims)
    }

    fn clear(&mut self) {
        self.store.clear();
        self.keys.clear();
    }

    fn dump(&self) -> Vec<(K, V)> {
        self.store.snapshot()
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Random
    }
}

impl<K, V, R> std::fmt::Debug for RandomCache<K, V, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomCache")
            .field("len", &self.keys.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
