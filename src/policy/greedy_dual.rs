//! GreedyDual core shared by [`GdsCache`](crate::policy::gds::GdsCache) and
//! [`GdfsCache`](crate::policy::gdfs::GdfsCache).
//!
//! Every entry carries a priority `H = weight + L`, where `weight` comes from
//! the entry's cost, size and reference count and `L` is the inflation
//! baseline. The victim is the entry with the lowest `H`; evicting it raises
//! `L` to that `H`, so entries that stay untouched age relative to new ones.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                   GreedyDualCache<K, V, W>                           │
//!   │                                                                      │
//!   │   baseline L: 3.5   (monotonic, reset to 0.0 by clear)               │
//!   │                                                                      │
//!   │   EntryStore<K, V, u64>                 PriorityIndex<K, Priority>   │
//!   │   ┌───────┬──────────────────────┐      ┌────────────────┬───────┐   │
//!   │   │ "q1"  │ cost 8, size 2, f 1  │      │ (4.5, seq 3)   │ "q4"  │◄─ victim
//!   │   │ "q4"  │ cost 1, size 1, f 1  │      │ (7.5, seq 2)   │ "q1"  │   │
//!   │   └───────┴──────────────────────┘      └────────────────┴───────┘   │
//!   │                                                                      │
//!   │   W::weight(cost, size, freq):  GDS  → cost / size                   │
//!   │                                 GDFS → freq · cost / size            │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! | Event           | Effect                                                 |
//! |-----------------|--------------------------------------------------------|
//! | insert          | evict min `H` if full (`L ← H_victim`), `f ← 1`, score |
//! | hit             | `f += 1`, `H ← weight + L` with the current `L`        |
//! | re-set          | overwrite cost/size/value, then as a hit               |
//! | remove          | drop entry, `L` unchanged                              |
//! | clear           | drop everything, `L ← 0`                               |
//!
//! Entries with equal `H` leave in the order their priority was last written.
//!
//! ## Academic Reference
//!
//! Cao, P., & Irani, S. (1997). "Cost-Aware WWW Proxy Caching Algorithms."
//! Cherkasova, L. (1998). "Improving WWW Proxy Performance with Greedy-Dual-
//! Size-Frequency Caching Policy."

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::ds::PriorityIndex;
use crate::error::{CacheError, Result, validate_capacity};
use crate::policy::StrategyKind;
use crate::store::{Entry, EntryStore};
use crate::traits::{EvictionStrategy, shrink_to};

/// Totally ordered eviction priority.
///
/// Wraps an `f64` and orders it with [`f64::total_cmp`]. Validated inputs
/// never produce NaN.
#[derive(Debug, Clone, Copy)]
pub struct Priority(pub f64);

impl Priority {
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Priority {}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an entry's cost, size and reference count become its priority weight.
pub trait PriorityWeight {
    /// Strategy this weighting implements.
    const KIND: StrategyKind;

    /// Weight added to the baseline to form `H`.
    fn weight(cost: f64, size: f64, frequency: u64) -> f64;
}

/// Rejects weights the GreedyDual formulas cannot score.
///
/// `size` must be finite and positive, `cost` finite and non-negative.
pub fn validate_weights(cost: f64, size: f64) -> Result<()> {
    if !size.is_finite() || size <= 0.0 {
        tracing::warn!(size, "rejected entry size");
        return Err(CacheError::invalid(format!(
            "size must be finite and > 0, got {size}"
        )));
    }
    if !cost.is_finite() || cost < 0.0 {
        tracing::warn!(cost, "rejected entry cost");
        return Err(CacheError::invalid(format!(
            "cost must be finite and >= 0, got {cost}"
        )));
    }
    Ok(())
}

/// GreedyDual eviction parameterized by its weighting rule.
pub struct GreedyDualCache<K, V, W> {
    store: EntryStore<K, V, u64>,
    ranking: PriorityIndex<K, Priority>,
    baseline: f64,
    capacity: usize,
    _weight: PhantomData<W>,
}

impl<K, V, W> GreedyDualCache<K, V, W>
where
    K: Eq + Hash + Clone,
    W: PriorityWeight,
{
    /// Creates a cache holding at most `capacity` entries with `L = 0`.
    pub fn try_new(capacity: usize) -> Result<Self> {
        validate_capacity(capacity)?;
        Ok(Self {
            store: EntryStore::with_capacity(capacity),
            ranking: PriorityIndex::with_capacity(capacity),
            baseline: 0.0,
            capacity,
            _weight: PhantomData,
        })
    }

    /// Current inflation baseline `L`.
    #[inline]
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Current priority `H` of `key`.
    pub fn priority(&self, key: &K) -> Option<f64> {
        self.ranking.score_of(key).map(|p| p.value())
    }

    /// Returns the key that would be evicted next with its priority.
    pub fn peek_victim(&self) -> Option<(&K, f64)> {
        self.ranking.peek_min().map(|(key, p)| (key, p.value()))
    }

    /// Reference count of `key` (1 on insert, +1 per hit or re-set).
    pub(crate) fn references(&self, key: &K) -> Option<u64> {
        self.store.get(key).map(|entry| entry.meta)
    }

    /// `H` for a hit; saturates at `f64::MAX` so `L` stays finite.
    fn score(&self, cost: f64, size: f64, frequency: u64) -> Priority {
        Priority((W::weight(cost, size, frequency) + self.baseline).min(f64::MAX))
    }

    /// `H` for a set against `baseline`; rejects weights whose priority
    /// overflows.
    fn checked_score(
        &self,
        cost: f64,
        size: f64,
        frequency: u64,
        baseline: f64,
    ) -> Result<Priority> {
        let priority = W::weight(cost, size, frequency) + baseline;
        if !priority.is_finite() {
            tracing::warn!(
                strategy = %W::KIND,
                cost,
                size,
                frequency,
                baseline,
                "rejected entry priority"
            );
            return Err(CacheError::invalid(format!(
                "priority for cost {cost} and size {size} is not finite"
            )));
        }
        Ok(Priority(priority))
    }

    /// Checks that `set(key, _, cost, size)` would succeed, without
    /// changing anything.
    pub fn validate_entry(&self, key: &K, cost: f64, size: f64) -> Result<()> {
        self.admission(key, cost, size).map(|_| ())
    }

    /// Priority `key` would be stored at by a `set` with these weights.
    fn admission(&self, key: &K, cost: f64, size: f64) -> Result<Priority> {
        validate_weights(cost, size)?;
        if let Some(frequency) = self.references(key) {
            return self.checked_score(cost, size, frequency + 1, self.baseline);
        }
        // score against the baseline the eviction will leave behind
        let baseline = match self.ranking.peek_min() {
            Some((_, victim)) if self.store.len() >= self.capacity => {
                self.baseline.max(victim.value())
            }
            _ => self.baseline,
        };
        self.checked_score(cost, size, 1, baseline)
    }

    /// Bumps the reference count and rescores against the current baseline.
    fn touch(&mut self, key: &K) -> bool {
        let Some(entry) = self.store.get_mut(key) else {
            return false;
        };
        entry.meta += 1;
        let (cost, size, frequency) = (entry.cost, entry.size, entry.meta);
        let priority = self.score(cost, size, frequency);
        self.ranking.update(key.clone(), priority);
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
        if let Some((_, min)) = self.ranking.peek_min() {
            if min.value() < self.baseline {
                return Err(InvariantError::new(format!(
                    "minimum priority {} below baseline {}",
                    min, self.baseline
                )));
            }
        }
        for (key, entry) in self.store.iter() {
            if entry.meta == 0 {
                return Err(InvariantError::new("entry with zero reference count"));
            }
            if !self.ranking.contains(key) {
                return Err(InvariantError::new("entry missing from ranking"));
            }
        }
        Ok(())
    }
}

impl<K, V, W> EvictionStrategy<K, V> for GreedyDualCache<K, V, W>
where
    K: Eq + Hash + Clone,
    V: Clone,
    W: PriorityWeight,
{
    fn try_get(&mut self, key: &K) -> Option<&V> {
        if !self.touch(key) {
            return None;
        }
        self.store.get(key).map(|entry| &entry.value)
    }

    fn set(&mut self, key: K, value: V, cost: f64, size: f64) -> Result<Option<K>> {
        let priority = self.admission(&key, cost, size)?;

        if let Some(entry) = self.store.get_mut(&key) {
            entry.value = value;
            entry.cost = cost;
            entry.size = size;
            entry.meta += 1;
            self.ranking.update(key, priority);
            return Ok(None);
        }

        let evicted = if self.store.len() >= self.capacity {
            self.evict()
        } else {
            None
        };
        self.ranking.update(key.clone(), priority);
        self.store.insert(key, Entry::new(value, cost, size, 1));
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
        let (victim, priority) = self.ranking.pop_min()?;
        self.store.remove(&victim);
        self.baseline = self.baseline.max(priority.value());
        tracing::debug!(
            strategy = %W::KIND,
            priority = priority.value(),
            baseline = self.baseline,
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
            strategy = %W::KIND,
            from = self.capacity,
            to = new_capacity,
            evicted = victims.len(),
            baseline = self.baseline,
            "resized cache"
        );
        self.capacity = new_capacity;
        Ok(victims)
    }

    fn clear(&mut self) {
        self.store.clear();
        self.ranking.clear();
        self.baseline = 0.0;
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
        W::KIND
    }
}

impl<K, V, W> fmt::Debug for GreedyDualCache<K, V, W>
where
    W: PriorityWeight,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreedyDualCache")
            .field("kind", &W::KIND)
            .field("len", &self.store.len())
            .field("capacity", &self.capacity)
            .field("baseline", &self.baseline)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_orders_with_total_cmp() {
        assert!(Priority(1.0) < Priority(2.0));
        assert!(Priority(-0.0) < Priority(0.0));
        assert_eq!(Priority(3.5), Priority(3.5));
        assert!(Priority(f64::INFINITY) > Priority(f64::MAX));
    }

    #[test]
    fn validate_weights_accepts_zero_cost() {
        assert!(validate_weights(0.0, 1.0).is_ok());
        assert!(validate_weights(12.5, 0.25).is_ok());
    }

    #[test]
    fn validate_weights_rejects_bad_size() {
        for size in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = validate_weights(1.0, size).unwrap_err();
            assert!(matches!(err, CacheError::InvalidConfiguration(_)), "size {size}");
        }
    }

    #[test]
    fn debug_output_reports_len_and_baseline() {
        let mut cache: crate::policy::gds::GdsCache<u32, u32> =
            GreedyDualCache::try_new(1).unwrap();
        cache.set(1, 1, 4.0, 1.0).unwrap();
        cache.set(2, 2, 4.0, 1.0).unwrap();
        let text = format!("{cache:?}");
        assert!(text.contains("len: 1"), "{text}");
        assert!(text.contains("baseline: 4.0"), "{text}");
    }

    #[test]
    fn validate_weights_rejects_bad_cost() {
        for cost in [-0.5, f64::NAN, f64::NEG_INFINITY, f64::INFINITY] {
            assert!(validate_weights(cost, 1.0).is_err(), "cost {cost}");
        }
    }
}
