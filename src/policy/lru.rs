//! # Least Recently Used (LRU) Strategy
//!
//! Evicts the entry whose last access (hit or insertion) is oldest.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LruCache<K, V>                              │
//!   │                                                                      │
//!   │   EntryStore<K, V, SlotId>                                           │
//!   │   ┌─────────┬───────────────────────────────────┐                    │
//!   │   │   Key   │ Entry { value, cost, size, slot } │                    │
//!   │   ├─────────┼───────────────────────────────────┤                    │
//!   │   │  "q1"   │ { plan₁, 4.0, 12.0, SlotId(2) } ──┼──┐                 │
//!   │   │  "q2"   │ { plan₂, 1.5,  3.0, SlotId(0) } ──┼──┼──┐              │
//!   │   └─────────┴───────────────────────────────────┘  │  │              │
//!   │                                                    ▼  ▼              │
//!   │   RecencyList<K>                                                     │
//!   │   head ──► [ "q2" ] ◄──► [ "q1" ] ◄── tail                           │
//!   │    (MRU)                               (LRU, next victim)            │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation   | Effect                                   | Complexity |
//! |-------------|------------------------------------------|------------|
//! | `try_get`   | Hit moves the key to the MRU end         | O(1)       |
//! | `set`       | New key: evict tail if full, push front  | O(1)       |
//! | `set`       | Existing key: overwrite, move to front   | O(1)       |
//! | `evict`     | Pop the tail                             | O(1)       |
//! | `resize`    | Pop tails until `len <= capacity`        | O(evicted) |
//!
//! `cost` and `size` are stored with each entry but never consulted.
//!
//! ## Example Usage
//!
//! ```
//! use plancache::policy::lru::LruCache;
//! use plancache::traits::EvictionStrategy;
//!
//! let mut cache = LruCache::try_new(2).unwrap();
//! cache.set("a", 1, 0.0, 1.0).unwrap();
//! cache.set("b", 2, 0.0, 1.0).unwrap();
//!
//! // Touch "a" so "b" becomes least recently used
//! assert_eq!(cache.try_get(&"a"), Some(&1));
//! assert_eq!(cache.set("c", 3, 0.0, 1.0).unwrap(), Some("b"));
//! assert_eq!(cache.keys_mru(), vec![&"c", &"a"]);
//! ```

use std::hash::Hash;

use crate::ds::{RecencyList, SlotId};
use crate::error::{Result, validate_capacity};
use crate::policy::StrategyKind;
use crate::store::{Entry, EntryStore};
use crate::traits::{EvictionStrategy, shrink_to};

/// Least-recently-used eviction over an arena-backed recency list.
#[derive(Debug)]
pub struct LruCache<K, V> {
    store: EntryStore<K, V, SlotId>,
    order: RecencyList<K>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache holding at most `capacity` entries.
    ///
    /// Returns [`InvalidConfiguration`](crate::error::CacheError::InvalidConfiguration)
    /// for a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self> {
        validate_capacity(capacity)?;
        Ok(Self {
            store: EntryStore::with_capacity(capacity),
            order: RecencyList::with_capacity(capacity),
            capacity,
        })
    }

    /// Returns the value for `key` without changing recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.store.get(key).map(|entry| &entry.value)
    }

    /// Returns the key that would be evicted next.
    pub fn peek_lru(&self) -> Option<&K> {
        self.order.back()
    }

    /// Keys from most to least recently used.
    pub fn keys_mru(&self) -> Vec<&K> {
        self.order.iter().collect()
    }

    /// Validates internal invariants (debug-only).
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> std::result::Result<(), crate::error::InvariantError> {
        use crate::error::InvariantError;

        if self.store.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "store holds {} entries but recency list holds {}",
                self.store.len(),
                self.order.len()
            )));
        }
        if self.store.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.store.len(),
                self.capacity
            )));
        }
        for (key, entry) in self.store.iter() {
            match self.order.get(entry.meta) {
                Some(listed) if listed == key => {},
                _ => {
                    return Err(InvariantError::new(format!(
                        "entry slot {} does not point back at its key",
                        entry.meta.index()
                    )));
                },
            }
        }
        Ok(())
    }
}

impl<K, V> EvictionStrategy<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn try_get(&mut self, key: &K) -> Option<&V> {
        let slot = self.store.get(key)?.meta;
        self.order.move_to_front(slot);
        self.store.get(key).map(|entry| &entry.value)
    }

    fn set(&mut self, key: K, value: V, cost: f64, size: f64) -> Result<Option<K>> {
        if let Some(entry) = self.store.get_mut(&key) {
            entry.value = value;
            entry.cost = cost;
            entry.size = size;
            let slot = entry.meta;
            self.order.move_to_front(slot);
            return Ok(None);
        }

        let evicted = if self.store.len() >= self.capacity {
            self.evict()
        } else {
            None
        };
        let slot = self.order.push_front(key.clone());
        self.store.insert(key, Entry::new(value, cost, size, slot));
        Ok(evicted)
    }

    fn has(&self, key: &K) -> bool {
        self.store.contains(key)
    }

    fn remove(&mut self, key: &K) -> bool {
        match self.store.remove(key) {
            Some(entry) => {
                self.order.remove(entry.meta);
                true
            },
            None => false,
        }
    }

    fn evict(&mut self) -> Option<K> {
        let victim = self.order.pop_back()?;
        self.store.remove(&victim);
        tracing::debug!(strategy = "LRU", len = self.store.len(), "evicted entry");
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
            strategy = "LRU",
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
        self.order.clear();
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
        StrategyKind::Lru
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    fn filled(capacity: usize, keys: &[&'static str]) -> LruCache<&'static str, u32> {
        let mut cache = LruCache::try_new(capacity).unwrap();
        for (i, key) in keys.iter().enumerate() {
            cache.set(*key, i as u32, 0.0, 1.0).unwrap();
        }
        cache
    }

    mod basic_behavior {
        use super::*;

        #[test]
        fn zero_capacity_is_rejected() {
            let err = LruCache::<u32, u32>::try_new(0).unwrap_err();
            assert!(matches!(err, CacheError::InvalidConfiguration(_)));
        }

        #[test]
        fn set_then_get_round_trips() {
            let mut cache = LruCache::try_new(3).unwrap();
            assert_eq!(cache.set("q", "plan", 2.0, 5.0).unwrap(), None);
            assert_eq!(cache.try_get(&"q"), Some(&"plan"));
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.name(), "LRU");
            cache.check_invariants().unwrap();
        }

        #[test]
        fn miss_has_no_side_effect() {
            let mut cache = filled(2, &["a", "b"]);
            assert_eq!(cache.try_get(&"zz"), None);
            assert_eq!(cache.keys_mru(), vec![&"b", &"a"]);
        }

        #[test]
        fn has_does_not_touch_recency() {
            let cache = filled(2, &["a", "b"]);
            assert!(cache.has(&"a"));
            assert_eq!(cache.peek_lru(), Some(&"a"));
        }

        #[test]
        fn remove_present_and_absent() {
            let mut cache = filled(3, &["a", "b"]);
            assert!(cache.remove(&"a"));
            assert!(!cache.remove(&"a"));
            assert_eq!(cache.len(), 1);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn dump_lists_all_entries() {
            let cache = filled(3, &["a", "b", "c"]);
            let mut dump = cache.dump();
            dump.sort();
            assert_eq!(dump, vec![("a", 0), ("b", 1), ("c", 2)]);
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn evicts_least_recently_used() {
            let mut cache = filled(2, &["a", "b"]);
            assert_eq!(cache.set("c", 9, 0.0, 1.0).unwrap(), Some("a"));
            assert!(!cache.has(&"a"));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn miss_after_eviction_then_recent_access_protects() {
            // A,B,C into capacity 2: C evicts A, so the access to A misses
            let mut cache = filled(2, &["A", "B"]);
            assert_eq!(cache.set("C", 2, 0.0, 1.0).unwrap(), Some("A"));
            assert_eq!(cache.try_get(&"A"), None);
            assert_eq!(cache.set("D", 3, 0.0, 1.0).unwrap(), Some("B"));
            assert!(cache.has(&"C"));
            assert!(cache.has(&"D"));
        }

        #[test]
        fn overwrite_refreshes_without_evicting() {
            let mut cache = filled(2, &["a", "b"]);
            assert_eq!(cache.set("a", 42, 1.0, 1.0).unwrap(), None);
            assert_eq!(cache.len(), 2);
            assert_eq!(cache.peek(&"a"), Some(&42));
            assert_eq!(cache.peek_lru(), Some(&"b"));
        }

        #[test]
        fn clear_then_reuse() {
            let mut cache = filled(2, &["a", "b"]);
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.evict(), None);
            cache.set("c", 1, 0.0, 1.0).unwrap();
            assert_eq!(cache.keys_mru(), vec![&"c"]);
            cache.check_invariants().unwrap();
        }
    }

    mod resize {
        use super::*;

        #[test]
        fn shrink_evicts_in_lru_order() {
            let mut cache = filled(5, &["a", "b", "c", "d", "e"]);
            cache.try_get(&"a");
            let victims = cache.resize(2).unwrap();
            assert_eq!(victims, vec!["b", "c", "d"]);
            assert_eq!(cache.capacity(), 2);
            assert_eq!(cache.keys_mru(), vec![&"a", &"e"]);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn grow_evicts_nothing() {
            let mut cache = filled(2, &["a", "b"]);
            assert!(cache.resize(10).unwrap().is_empty());
            assert_eq!(cache.capacity(), 10);
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn same_capacity_is_noop() {
            let mut cache = filled(2, &["a", "b"]);
            assert!(cache.resize(2).unwrap().is_empty());
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn zero_is_rejected_without_change() {
            let mut cache = filled(2, &["a", "b"]);
            assert!(cache.resize(0).is_err());
            assert_eq!(cache.capacity(), 2);
            assert_eq!(cache.len(), 2);
        }
    }
}
