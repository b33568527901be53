//! # LRU-K Strategy
//!
//! Exact LRU-K replacement: each entry keeps its last `K` reference
//! timestamps from a logical clock, and the victim is the entry with the
//! largest backward K-distance.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         LrukCache<K, V>                              │
//!   │                                                                      │
//!   │   clock: 9 (ticks on every hit and every set)                        │
//!   │                                                                      │
//!   │   EntryStore<K, V, LrukMeta>            PriorityIndex<K, Rank>       │
//!   │   ┌───────┬─────────────────────────┐   ┌────────────────────────┐   │
//!   │   │ "q1"  │ history [9, 4], refs 3  │   │ (cold, 0, 1, seq 2) q7 │◄─ victim
//!   │   │ "q5"  │ history [6, 2], refs 2  │   │ (hot,  2, 2, seq 1) q5 │   │
//!   │   │ "q7"  │ history [8],    refs 1  │   │ (hot,  4, 3, seq 0) q1 │   │
//!   │   └───────┴─────────────────────────┘   └────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Eviction Order
//!
//! ```text
//!   backward K-distance = now − (K-th most recent timestamp), ∞ if < K refs
//!
//!   1. Entries with fewer than K references (distance ∞) go first,
//!      fewest total references first, then earliest insertion.
//!   2. Otherwise the oldest K-th most recent timestamp goes first
//!      (largest finite distance).
//! ```
//!
//! The rank of an entry only changes when that entry is referenced, because
//! comparing distances at one instant is the same as comparing K-th
//! timestamps. Ranks live in an ordered [`PriorityIndex`], so hits, sets and
//! evictions are O(log n).
//!
//! ## Example Usage
//!
//! ```
//! use plancache::policy::lru_k::LrukCache;
//! use plancache::traits::EvictionStrategy;
//!
//! let mut cache = LrukCache::try_with_k(2, 2).unwrap();
//! cache.set("hot", 1, 0.0, 1.0).unwrap();
//! cache.set("scan", 2, 0.0, 1.0).unwrap();
//! cache.try_get(&"hot");
//!
//! // "scan" was referenced once, so its K-distance is infinite
//! assert_eq!(cache.k_distance(&"scan"), None);
//! assert_eq!(cache.k_distance(&"hot"), Some(2));
//! assert_eq!(cache.set("next", 3, 0.0, 1.0).unwrap(), Some("scan"));
//! ```
//!
//! ## Academic Reference
//!
//! O'Neil, E. J., O'Neil, P. E., & Weikum, G. (1993).
//! "The LRU-K page replacement algorithm for database disk buffering."

use std::hash::Hash;

use crate::ds::{PriorityIndex, ReferenceHistory};
use crate::error::{CacheError, Result, validate_capacity};
use crate::policy::StrategyKind;
use crate::store::{Entry, EntryStore};
use crate::traits::{EvictionStrategy, shrink_to};

/// Default history depth.
pub const DEFAULT_K: usize = 2;

/// Eviction rank; the smallest rank is the next victim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Rank {
    satisfied: bool,
    kth: u64,
    references: u64,
    inserted: u64,
}

#[derive(Debug, Clone)]
struct LrukMeta {
    history: ReferenceHistory,
    references: u64,
    inserted: u64,
}

impl LrukMeta {
    fn rank(&self, k: usize) -> Rank {
        let kth = self.history.kth_most_recent(k);
        Rank {
            satisfied: kth.is_some(),
            kth: kth.unwrap_or(0),
            references: self.references,
            inserted: self.inserted,
        }
    }
}

/// LRU-K eviction with a logical reference clock.
#[derive(Debug)]
pub struct LrukCache<K, V> {
    store: EntryStore<K, V, LrukMeta>,
    ranking: PriorityIndex<K, Rank>,
    k: usize,
    capacity: usize,
    clock: u64,
    insertions: u64,
}

impl<K, V> LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU-2 cache.
    pub fn try_new(capacity: usize) -> Result<Self> {
        Self::try_with_k(capacity, DEFAULT_K)
    }

    /// Creates an LRU-K cache tracking the last `k` references per entry.
    ///
    /// Both `capacity` and `k` must be positive.
    pub fn try_with_k(capacity: usize, k: usize) -> Result<Self> {
        validate_capacity(capacity)?;
        if k == 0 {
            tracing::warn!(k, "rejected LRU-K history depth");
            return Err(CacheError::invalid("LRU-K requires k >= 1"));
        }
        Ok(Self {
            store: EntryStore::with_capacity(capacity),
            ranking: PriorityIndex::with_capacity(capacity),
            k,
            capacity,
            clock: 0,
            insertions: 0,
        })
    }

    /// History depth K.
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Current value of the logical clock.
    #[inline]
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Backward K-distance of `key`.
    ///
    /// `None` means the distance is infinite (fewer than K references) or the
    /// key is absent; use [`has`](EvictionStrategy::has) to tell them apart.
    pub fn k_distance(&self, key: &K) -> Option<u64> {
        let entry = self.store.get(key)?;
        entry
            .meta
            .history
            .kth_most_recent(self.k)
            .map(|kth| self.clock - kth)
    }

    /// Total references to `key` since it was inserted.
    pub fn reference_count(&self, key: &K) -> Option<u64> {
        self.store.get(key).map(|entry| entry.meta.references)
    }

    /// Retained reference timestamps, most recent first.
    pub fn history(&self, key: &K) -> Option<Vec<u64>> {
        self.store.get(key).map(|entry| entry.meta.history.to_vec_mru())
    }

    /// Returns the key that would be evicted next.
    pub fn peek_victim(&self) -> Option<&K> {
        self.ranking.peek_min().map(|(key, _)| key)
    }

    /// Position of `key` in eviction order (0 = next victim).
    pub fn eviction_rank(&self, key: &K) -> Option<usize> {
        let target = self.ranking.score_of(key)?;
        Some(self.ranking.iter().take_while(|(_, rank)| *rank < target).count())
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn reference(&mut self, key: &K) -> bool {
        if !self.store.contains(key) {
            return false;
        }
        let now = self.tick();
        let k = self.k;
        let Some(entry) = self.store.get_mut(key) else {
            return false;
        };
        entry.meta.history.record(now);
        entry.meta.references += 1;
        let rank = entry.meta.rank(k);
        self.ranking.update(key.clone(), rank);
        true
    }

    /// Validates internal invariants (debug-only).
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> std::result::Result<(), crate::error::InvariantError> {
        use crate::error::InvariantError;

        if self.store.len() != self.ranking.len() {
            return Err(InvariantError::new(format!(
                "store holds {} entries but ranking holds {}",
                self.store.len(),
                self.ranking.len()
            )));
        }
        if self.store.len() > self.capacity {
            return Err(InvariantError::new("len exceeds capacity"));
        }
        for (key, entry) in self.store.iter() {
            let expected = entry.meta.rank(self.k);
            if self.ranking.score_of(key) != Some(&expected) {
                return Err(InvariantError::new("stale LRU-K rank"));
            }
            if entry.meta.history.most_recent().is_some_and(|ts| ts > self.clock) {
                return Err(InvariantError::new("reference timestamp ahead of clock"));
            }
            if entry.meta.references < entry.meta.history.len() as u64 {
                return Err(InvariantError::new("history longer than reference count"));
            }
        }
        Ok(())
    }
}

impl<K, V> EvictionStrategy<K, V> for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn try_get(&mut self, key: &K) -> Option<&V> {
        if !self.reference(key) {
            return None;
        }
        self.store.get(key).map(|entry| &entry.value)
    }

    fn set(&mut self, key: K, value: V, cost: f64, size: f64) -> Result<Option<K>> {
        if let Some(entry) = self.store.get_mut(&key) {
            entry.value = value;
            entry.cost = cost;
            entry.size = size;
            self.reference(&key);
            return Ok(None);
        }

        let evicted = if self.store.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let now = self.tick();
        let mut history = ReferenceHistory::new(self.k);
        history.record(now);
        let meta = LrukMeta {
            history,
            references: 1,
            inserted: self.insertions,
        };
        self.insertions += 1;
        self.ranking.update(key.clone(), meta.rank(self.k));
        self.store.insert(key, Entry::new(value, cost, size, meta));
        Ok(evicted)
    }

    fn has(&self, key: &K) -> bool {
        self.store.contains(key)
    }

    fn remove(&mut self, key: &K) -> bool {
        if self.store.remove(key).is_none() {
            return false;
        }
        self.ranking.remove(key);
        true
    }

    fn evict(&mut self) -> Option<K> {
        let (victim, rank) = self.ranking.pop_min()?;
        self.store.remove(&victim);
        tracing::debug!(
            strategy = "LRU_K",
            k = self.k,
            infinite_distance = !rank.satisfied,
            references = rank.references,
            len = self.store.len(),
            "evicted entry"
        );
        Some(victim)
    }

    fn resize(&mut self, new_capacity: usize) -> Result<Vec<K>> {
        validate_capacity(new_capacity)?;
        if new_capacity == self.capacity {
            return Ok(Vec::new());
        }
        let len = self.store.len();
        let victims = shrink_to(len, new_capacity, || self.evict());
        tracing::info!(
            strategy = "LRU_K",
            k = self.k,
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
        self.ranking.clear();
        self.clock = 0;
        self.insertions = 0;
    }

    fn dump(&self) -> Vec<(K, V)> {
        self.store.snapshot()
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::LruK(self.k)
    }
}
