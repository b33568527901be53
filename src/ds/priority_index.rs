//! Ordered priority index with key handles.
//!
//! Keeps every live key in a `BTreeMap` ordered by `(score, seq)` and remembers
//! each key's current handle in an `FxHashMap`, so a score change removes the
//! old ordered entry instead of leaving a stale one behind. Updates and
//! extract-min are O(log n) with no rebuild step.
//!
//! ## Architecture
//!
//! ```text
//!   handles: FxHashMap<K, (S, seq)>        order: BTreeMap<(S, seq), K>
//!   ┌───────┬────────────┐                 ┌────────────┬───────┐
//!   │ "q1"  │ (2.5, 7)   │ ───────────────►│ (1.0, 4)   │ "q3"  │ ◄── min
//!   │ "q3"  │ (1.0, 4)   │                 │ (2.5, 6)   │ "q9"  │
//!   │ "q9"  │ (2.5, 6)   │                 │ (2.5, 7)   │ "q1"  │
//!   └───────┴────────────┘                 └────────────┴───────┘
//!
//!   update("q3", 3.0):
//!     1. order.remove((1.0, 4))
//!     2. order.insert((3.0, 8), "q3"), handles["q3"] = (3.0, 8)
//!     3. seq = 9
//! ```
//!
//! Equal scores pop in the order their scores were last written, because
//! every update takes a fresh sequence number.
//!
//! ## Operations
//!
//! | Operation  | Description                      | Complexity |
//! |------------|----------------------------------|------------|
//! | `update`   | Insert or rescore a key          | O(log n)   |
//! | `remove`   | Drop a key                       | O(log n)   |
//! | `peek_min` | Lowest `(score, seq)` key        | O(log n)   |
//! | `pop_min`  | Remove and return the lowest     | O(log n)   |
//! | `score_of` | Current score for a key          | O(1)       |
//!
//! ## Example Usage
//!
//! ```
//! use plancache::ds::PriorityIndex;
//!
//! let mut index: PriorityIndex<&str, u32> = PriorityIndex::new();
//! index.update("a", 5);
//! index.update("b", 2);
//! index.update("c", 8);
//!
//! // Rescoring moves the key, it does not leave a stale copy
//! index.update("a", 1);
//! assert_eq!(index.len(), 3);
//!
//! assert_eq!(index.pop_min(), Some(("a", 1)));
//! assert_eq!(index.pop_min(), Some(("b", 2)));
//! assert_eq!(index.pop_min(), Some(("c", 8)));
//! assert_eq!(index.pop_min(), None);
//! ```
//!
//! ## Implementation Notes
//!
//! - Scores must be totally ordered; GDS/GDFS wrap `f64` in a newtype using
//!   `f64::total_cmp`
//! - `debug_validate_invariants()` available in debug/test builds

use std::collections::BTreeMap;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Min-ordered index from keys to scores.
#[derive(Debug)]
pub struct PriorityIndex<K, S> {
    order: BTreeMap<(S, u64), K>,
    handles: FxHashMap<K, (S, u64)>,
    seq: u64,
}

impl<K, S> PriorityIndex<K, S>
where
    K: Eq + Hash + Clone,
    S: Ord + Clone,
{
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty index with room for `capacity` keys in the handle map.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: BTreeMap::new(),
            handles: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            seq: 0,
        }
    }

    /// Returns the number of indexed keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if no keys are indexed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Returns `true` if `key` is indexed.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.handles.contains_key(key)
    }

    /// Returns the current score of `key`.
    pub fn score_of(&self, key: &K) -> Option<&S> {
        self.handles.get(key).map(|(score, _)| score)
    }

    /// Inserts `key` or replaces its score, returning the previous score.
    pub fn update(&mut self, key: K, score: S) -> Option<S> {
        let seq = self.next_seq();
        let previous = self.handles.insert(key.clone(), (score.clone(), seq));
        if let Some(ref handle) = previous {
            self.order.remove(handle);
        }
        self.order.insert((score, seq), key);
        previous.map(|(score, _)| score)
    }

    /// Removes `key`, returning its score.
    pub fn remove(&mut self, key: &K) -> Option<S> {
        let handle = self.handles.remove(key)?;
        self.order.remove(&handle);
        Some(handle.0)
    }

    /// Returns the key with the lowest score without removing it.
    pub fn peek_min(&self) -> Option<(&K, &S)> {
        self.order
            .iter()
            .next()
            .map(|((score, _), key)| (key, score))
    }

    /// Removes and returns the key with the lowest score.
    pub fn pop_min(&mut self) -> Option<(K, S)> {
        let ((score, _), key) = self.order.pop_first()?;
        self.handles.remove(&key);
        Some((key, score))
    }

    /// Iterates keys from lowest to highest score.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &S)> {
        self.order.iter().map(|((score, _), key)| (key, score))
    }

    /// Removes every key. The sequence counter keeps running.
    pub fn clear(&mut self) {
        self.order.clear();
        self.handles.clear();
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq = self.seq.wrapping_add(1);
        seq
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.order.len(), self.handles.len());
        for (handle, key) in &self.order {
            let stored = self.handles.get(key).expect("ordered key must have a handle");
            assert!(stored == handle, "handle out of sync with ordered entry");
        }
    }
}

impl<K, S> Default for PriorityIndex<K, S>
where
    K: Eq + Hash + Clone,
    S: Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_min_returns_lowest_score() {
        let mut index = PriorityIndex::new();
        index.update("x", 30);
        index.update("y", 10);
        index.update("z", 20);
        assert_eq!(index.peek_min(), Some((&"y", &10)));
        assert_eq!(index.pop_min(), Some(("y", 10)));
        assert_eq!(index.pop_min(), Some(("z", 20)));
        index.debug_validate_invariants();
    }

    #[test]
    fn update_replaces_previous_handle() {
        let mut index = PriorityIndex::new();
        assert_eq!(index.update("a", 5), None);
        assert_eq!(index.update("a", 9), Some(5));
        assert_eq!(index.len(), 1);
        assert_eq!(index.score_of(&"a"), Some(&9));
        index.debug_validate_invariants();
    }

    #[test]
    fn equal_scores_pop_in_update_order() {
        let mut index = PriorityIndex::new();
        index.update("first", 1);
        index.update("second", 1);
        index.update("third", 1);
        // rewriting "first" moves it behind the others
        index.update("first", 1);
        assert_eq!(index.pop_min().map(|(k, _)| k), Some("second"));
        assert_eq!(index.pop_min().map(|(k, _)| k), Some("third"));
        assert_eq!(index.pop_min().map(|(k, _)| k), Some("first"));
    }

    #[test]
    fn remove_drops_ordered_entry() {
        let mut index = PriorityIndex::new();
        index.update(1u32, 3u32);
        index.update(2, 1);
        assert_eq!(index.remove(&2), Some(1));
        assert_eq!(index.remove(&2), None);
        assert!(!index.contains(&2));
        assert_eq!(index.peek_min(), Some((&1, &3)));
        index.debug_validate_invariants();
    }

    #[test]
    fn iter_is_ascending() {
        let mut index = PriorityIndex::new();
        for (k, s) in [("c", 3), ("a", 1), ("b", 2)] {
            index.update(k, s);
        }
        let keys: Vec<_> = index.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn clear_empties_index() {
        let mut index = PriorityIndex::new();
        index.update("a", 1);
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.pop_min(), None);
        index.debug_validate_invariants();
    }
}
