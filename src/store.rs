//! Entry store shared by every eviction strategy.
//!
//! ## Architecture
//! - Entries live in an `FxHashMap<K, Entry<V, M>>` for O(1) lookup.
//! - `M` is the per-strategy metadata (recency slot, reference history,
//!   priority, dense index). The store never interprets it.
//! - Capacity is enforced by the strategy that owns the store, by entry count.
//!
//! ## Core Operations
//! - `insert`: place a new entry or replace an existing one.
//! - `get` / `get_mut`: lookup by key without policy side effects.
//! - `remove`: delete by key, returning the entry.
//! - `snapshot`: clone every `(key, value)` pair for `dump`.
//!
//! ## Example Usage
//! ```rust
//! use plancache::store::{Entry, EntryStore};
//!
//! let mut store: EntryStore<&str, String, u64> = EntryStore::with_capacity(2);
//! store.insert("q1", Entry::new("plan".to_string(), 3.0, 1.0, 0));
//! assert_eq!(store.get(&"q1").map(|e| e.value.as_str()), Some("plan"));
//! assert_eq!(store.get(&"q1").map(|e| e.cost), Some(3.0));
//! ```
//!
//! ## Thread Safety
//! - `EntryStore` is single-threaded; the concurrent façade locks around it.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// A cached value with caller-supplied weights and strategy metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<V, M> {
    /// Cached payload.
    pub value: V,
    /// Cost to produce the value (e.g. planning time).
    pub cost: f64,
    /// Abstract size weight (e.g. token count).
    pub size: f64,
    /// Strategy-specific bookkeeping.
    pub meta: M,
}

impl<V, M> Entry<V, M> {
    /// Creates an entry.
    #[inline]
    pub fn new(value: V, cost: f64, size: f64, meta: M) -> Self {
        Self {
            value,
            cost,
            size,
            meta,
        }
    }
}

/// Keyed collection of entries owned by one strategy.
#[derive(Debug)]
pub struct EntryStore<K, V, M> {
    map: FxHashMap<K, Entry<V, M>>,
}

impl<K, V, M> EntryStore<K, V, M> {
    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` when the store holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, V, M> EntryStore<K, V, M>
where
    K: Eq + Hash,
{
    /// Creates a store pre-sized for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: &K) -> Option<&Entry<V, M>> {
        self.map.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut Entry<V, M>> {
        self.map.get_mut(key)
    }

    /// Inserts `entry`, returning the entry it replaced.
    #[inline]
    pub fn insert(&mut self, key: K, entry: Entry<V, M>) -> Option<Entry<V, M>> {
        self.map.insert(key, entry)
    }

    /// Removes the entry under `key`.
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<Entry<V, M>> {
        self.map.remove(key)
    }

    /// Drops every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Iterates live entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Entry<V, M>)> {
        self.map.iter()
    }

    /// Iterates live keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    /// Clones every `(key, value)` pair.
    pub fn snapshot(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.map
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }
}

impl<K, V, M> Default for EntryStore<K, V, M>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_and_returns_previous() {
        let mut store: EntryStore<u32, &str, ()> = EntryStore::with_capacity(4);
        assert!(store.insert(1, Entry::new("a", 1.0, 1.0, ())).is_none());
        let old = store.insert(1, Entry::new("b", 2.0, 1.0, ()));
        assert_eq!(old.map(|e| e.value), Some("a"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&1).map(|e| e.cost), Some(2.0));
    }

    #[test]
    fn get_mut_updates_metadata_in_place() {
        let mut store: EntryStore<&str, u8, u64> = EntryStore::default();
        store.insert("k", Entry::new(0, 0.0, 1.0, 1));
        if let Some(entry) = store.get_mut(&"k") {
            entry.meta += 1;
        }
        assert_eq!(store.get(&"k").map(|e| e.meta), Some(2));
    }

    #[test]
    fn remove_and_clear() {
        let mut store: EntryStore<u8, u8, ()> = EntryStore::default();
        store.insert(1, Entry::new(1, 0.0, 1.0, ()));
        store.insert(2, Entry::new(2, 0.0, 1.0, ()));
        assert!(store.remove(&1).is_some());
        assert!(store.remove(&1).is_none());
        assert!(store.contains(&2));
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn len_needs_no_key_bounds() {
        struct Opaque;
        fn count<K, V, M>(store: &EntryStore<K, V, M>) -> usize {
            store.len()
        }
        let mut store: EntryStore<u8, Opaque, ()> = EntryStore::default();
        store.insert(1, Entry::new(Opaque, 0.0, 1.0, ()));
        assert_eq!(count(&store), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn snapshot_clones_pairs() {
        let mut store: EntryStore<u8, String, ()> = EntryStore::default();
        store.insert(1, Entry::new("one".into(), 0.0, 1.0, ()));
        store.insert(2, Entry::new("two".into(), 0.0, 1.0, ()));
        let mut dump = store.snapshot();
        dump.sort();
        assert_eq!(dump, vec![(1, "one".to_string()), (2, "two".to_string())]);
    }
}
