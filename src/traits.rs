//! # Eviction Strategy Contract
//!
//! Every strategy in [`crate::policy`] implements [`EvictionStrategy`], the
//! single capability set the façade and the registry program against.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌─────────────────────────────────────────────────┐
//!                 │            EvictionStrategy<K, V>               │
//!                 │                                                 │
//!                 │  try_get(&mut, &K) → Option<&V>                 │
//!                 │  set(&mut, K, V, cost, size) → Result<Option<K>>│
//!                 │  has(&, &K) → bool                              │
//!                 │  remove(&mut, &K) → bool                        │
//!                 │  evict(&mut) → Option<K>                        │
//!                 │  resize(&mut, usize) → Result<Vec<K>>           │
//!                 │  clear(&mut)                                    │
//!                 │  dump(&) → Vec<(K, V)>                          │
//!                 │  len / is_empty / capacity / kind / name        │
//!                 └──────────────────────┬──────────────────────────┘
//!                                        │
//!       ┌──────────────┬─────────────────┼────────────────┬───────────────┐
//!       ▼              ▼                 ▼                ▼               ▼
//!   LruCache       LrukCache         GdsCache        GdfsCache      RandomCache
//!   recency list   K-distance rank   cost/size + L   freq·cost/size  uniform draw
//! ```
//!
//! ## Shared Semantics
//!
//! | Operation  | Hit / present                     | Miss / absent              |
//! |------------|-----------------------------------|----------------------------|
//! | `try_get`  | returns value, updates metadata   | `None`, no side effect     |
//! | `set`      | overwrite, refresh, never evicts  | evict ≤ 1 if full, insert  |
//! | `has`      | `true`, no side effect            | `false`                    |
//! | `remove`   | `true`                            | `false`                    |
//!
//! - Eviction happens before the new entry is placed.
//! - `resize` below `len()` evicts one victim at a time by the normal policy
//!   and returns them in eviction order; growing evicts nothing.
//! - Any `Err` is returned before the strategy is mutated.
//!
//! ## Example Usage
//!
//! ```
//! use plancache::policy::lru::LruCache;
//! use plancache::traits::EvictionStrategy;
//!
//! fn warm<C: EvictionStrategy<String, String>>(cache: &mut C, keys: &[&str]) {
//!     for key in keys {
//!         cache.set(key.to_string(), format!("plan:{key}"), 1.0, 1.0).unwrap();
//!     }
//! }
//!
//! let mut cache = LruCache::try_new(2).unwrap();
//! warm(&mut cache, &["a", "b", "c"]);
//! assert_eq!(cache.len(), 2);
//! assert!(!cache.has(&"a".to_string()));
//! ```
//!
//! ## Thread Safety
//!
//! Strategies are `&mut self` types with no internal locking. Wrap a façade in
//! [`ConcurrentQueryCache`](crate::concurrent::ConcurrentQueryCache) for shared
//! access; it implements the [`ConcurrentCache`] marker.

use crate::error::Result;
use crate::policy::StrategyKind;

/// Capability set shared by every eviction strategy.
///
/// # Type Parameters
///
/// - `K`: Key type (implementations require `Eq + Hash + Clone`)
/// - `V`: Value type (implementations require `Clone` for [`dump`](Self::dump))
pub trait EvictionStrategy<K, V> {
    /// Looks up `key`, updating policy metadata on a hit.
    ///
    /// A miss returns `None` and leaves the strategy untouched.
    fn try_get(&mut self, key: &K) -> Option<&V>;

    /// Inserts or overwrites an entry.
    ///
    /// Returns the key evicted to make room, if any. Overwriting an existing
    /// key refreshes its metadata as if it were accessed and never evicts.
    fn set(&mut self, key: K, value: V, cost: f64, size: f64) -> Result<Option<K>>;

    /// Returns `true` if `key` is cached, without touching metadata.
    fn has(&self, key: &K) -> bool;

    /// Removes `key`; returns `false` if it was absent.
    fn remove(&mut self, key: &K) -> bool;

    /// Evicts one entry by policy and returns its key.
    fn evict(&mut self) -> Option<K>;

    /// Changes capacity, evicting down to `new_capacity` when shrinking.
    ///
    /// Returns evicted keys in eviction order. Zero is rejected.
    fn resize(&mut self, new_capacity: usize) -> Result<Vec<K>>;

    /// Drops every entry and resets baseline state.
    fn clear(&mut self);

    /// Snapshot of all live entries in unspecified order.
    fn dump(&self) -> Vec<(K, V)>;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entries are cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of live entries.
    fn capacity(&self) -> usize;

    /// Which strategy this is, including parameters such as K.
    fn kind(&self) -> StrategyKind;

    /// Display name (`"LRU"`, `"LRU_3"`, `"GDS"`, ...).
    fn name(&self) -> String {
        self.kind().to_string()
    }
}

/// Marker trait for caches that are safe to share across threads.
pub trait ConcurrentCache: Send + Sync {}

/// Evicts through `evict` until `len` fits `target`, collecting victims in order.
pub(crate) fn shrink_to<K>(
    mut len: usize,
    target: usize,
    mut evict: impl FnMut() -> Option<K>,
) -> Vec<K> {
    let mut victims = Vec::with_capacity(len.saturating_sub(target));
    while len > target {
        match evict() {
            Some(key) => {
                victims.push(key);
                len -= 1;
            },
            None => break,
        }
    }
    victims
}
