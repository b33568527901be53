//! Eviction strategies and the runtime-swappable [`Strategy`] wrapper.
//!
//! | Strategy  | Type                         | Victim                               |
//! |-----------|------------------------------|--------------------------------------|
//! | LRU       | [`lru::LruCache`]            | Oldest last access                   |
//! | LRU-K     | [`lru_k::LrukCache`]         | Largest backward K-distance          |
//! | GDS       | [`gds::GdsCache`]            | Lowest `cost/size + L`               |
//! | GDFS      | [`gdfs::GdfsCache`]          | Lowest `freq·cost/size + L`          |
//! | Random    | [`random::RandomCache`]      | Uniform draw                         |
//!
//! [`StrategyKind`] names a strategy (and its K) and is what configuration
//! files and the registry speak. [`Strategy`] owns one built strategy and
//! forwards the [`EvictionStrategy`] contract to it.
//!
//! ## Example
//!
//! ```rust
//! use plancache::policy::{Strategy, StrategyKind};
//! use plancache::traits::EvictionStrategy;
//!
//! let kind: StrategyKind = "lru-k(3)".parse().unwrap();
//! assert_eq!(kind, StrategyKind::LruK(3));
//! assert_eq!(kind.to_string(), "LRU_3");
//!
//! let mut cache = Strategy::<u64, String>::build(kind, 100).unwrap();
//! cache.set(1, "plan".to_string(), 1.0, 1.0).unwrap();
//! assert_eq!(cache.try_get(&1), Some(&"plan".to_string()));
//! assert_eq!(cache.name(), "LRU_3");
//! ```

pub mod gdfs;
pub mod gds;
pub mod greedy_dual;
pub mod lru;
pub mod lru_k;
pub mod random;

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};
use crate::traits::EvictionStrategy;

use self::gdfs::GdfsCache;
use self::gds::GdsCache;
use self::lru::LruCache;
use self::lru_k::LrukCache;
use self::random::RandomCache;

/// Available eviction strategies.
///
/// Parses case-insensitively from `lru`, `lru-k(3)`, `lru_k(3)`, `lru_3`,
/// `lru-k` (K = 2), `gds`, `gdfs` and `random`, and displays as `LRU`,
/// `LRU_3`, `GDS`, `GDFS`, `RANDOM`. Serde uses the same strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StrategyKind {
    /// Least Recently Used.
    Lru,
    /// LRU-K with the given history depth.
    LruK(usize),
    /// GreedyDual-Size.
    Gds,
    /// GreedyDual-Size-Frequency.
    Gdfs,
    /// Uniform random replacement.
    Random,
}

impl StrategyKind {
    /// Rejects parameters the strategy cannot be built with.
    pub fn validate(self) -> Result<()> {
        match self {
            Self::LruK(0) => {
                tracing::warn!("rejected LRU-K history depth 0");
                Err(CacheError::invalid("LRU-K requires k >= 1"))
            },
            _ => Ok(()),
        }
    }

    /// Returns `true` for strategies whose `set` validates cost and size.
    pub fn is_cost_aware(self) -> bool {
        matches!(self, Self::Gds | Self::Gdfs)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lru => write!(f, "LRU"),
            Self::LruK(k) => write!(f, "LRU_{k}"),
            Self::Gds => write!(f, "GDS"),
            Self::Gdfs => write!(f, "GDFS"),
            Self::Random => write!(f, "RANDOM"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase().replace('-', "_");
        let kind = match name.as_str() {
            "lru" => Self::Lru,
            "lru_k" | "lruk" => Self::LruK(lru_k::DEFAULT_K),
            "gds" => Self::Gds,
            "gdfs" | "gdsf" => Self::Gdfs,
            "random" | "rand" => Self::Random,
            other => {
                let digits = other
                    .strip_prefix("lru_k(")
                    .or_else(|| other.strip_prefix("lruk("))
                    .and_then(|rest| rest.strip_suffix(')'))
                    .or_else(|| other.strip_prefix("lru_"));
                match digits.and_then(|d| d.trim().parse::<usize>().ok()) {
                    Some(k) => Self::LruK(k),
                    None => {
                        tracing::warn!(strategy = s, "unparseable strategy name");
                        return Err(CacheError::invalid(format!(
                            "unknown strategy '{s}', expected lru, lru-k(N), gds, gdfs or random"
                        )));
                    },
                }
            },
        };
        kind.validate()?;
        Ok(kind)
    }
}

impl TryFrom<String> for StrategyKind {
    type Error = CacheError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<StrategyKind> for String {
    fn from(kind: StrategyKind) -> Self {
        kind.to_string()
    }
}

/// One built strategy, selected at runtime.
#[derive(Debug)]
pub enum Strategy<K, V> {
    Lru(LruCache<K, V>),
    LruK(LrukCache<K, V>),
    Gds(GdsCache<K, V>),
    Gdfs(GdfsCache<K, V>),
    Random(RandomCache<K, V>),
}

impl<K, V> Strategy<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Builds `kind` with `capacity`; Random is seeded from OS entropy.
    pub fn build(kind: StrategyKind, capacity: usize) -> Result<Self> {
        Self::build_with_seed(kind, capacity, None)
    }

    /// Builds `kind` with `capacity`, seeding Random with `seed` when given.
    pub fn build_with_seed(kind: StrategyKind, capacity: usize, seed: Option<u64>) -> Result<Self> {
        kind.validate()?;
        let strategy = match kind {
            StrategyKind::Lru => Self::Lru(LruCache::try_new(capacity)?),
            StrategyKind::LruK(k) => Self::LruK(LrukCache::try_with_k(capacity, k)?),
            StrategyKind::Gds => Self::Gds(GdsCache::try_new(capacity)?),
            StrategyKind::Gdfs => Self::Gdfs(GdfsCache::try_new(capacity)?),
            StrategyKind::Random => Self::Random(match seed {
                Some(seed) => RandomCache::with_seed(capacity, seed)?,
                None => RandomCache::try_new(capacity)?,
            }),
        };
        Ok(strategy)
    }

    /// Checks `cost` and `size` the way this strategy's `set(key, ..)` would.
    pub fn validate_entry(&self, key: &K, cost: f64, size: f64) -> Result<()> {
        match self {
            Self::Gds(cache) => cache.validate_entry(key, cost, size),
            Self::Gdfs(cache) => cache.validate_entry(key, cost, size),
            _ => Ok(()),
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Strategy::Lru($inner) => $body,
            Strategy::LruK($inner) => $body,
            Strategy::Gds($inner) => $body,
            Strategy::Gdfs($inner) => $body,
            Strategy::Random($inner) => $body,
        }
    };
}

impl<K, V> EvictionStrategy<K, V> for Strategy<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn try_get(&mut self, key: &K) -> Option<&V> {
        dispatch!(self, c => c.try_get(key))
    }

    fn set(&mut self, key: K, value: V, cost: f64, size: f64) -> Result<Option<K>> {
        dispatch!(self, c => c.set(key, value, cost, size))
    }

    fn has(&self, key: &K) -> bool {
        dispatch!(self, c => c.has(key))
    }

    fn remove(&mut self, key: &K) -> bool {
        dispatch!(self, c => c.remove(key))
    }

    fn evict(&mut self) -> Option<K> {
        dispatch!(self, c => c.evict())
    }

    fn resize(&mut self, new_capacity: usize) -> Result<Vec<K>> {
        dispatch!(self, c => c.resize(new_capacity))
    }

    fn clear(&mut self) {
        dispatch!(self, c => c.clear())
    }

    fn dump(&self) -> Vec<(K, V)> {
        dispatch!(self, c => c.dump())
    }

    fn len(&self) -> usize {
        dispatch!(self, c => c.len())
    }

    fn capacity(&self) -> usize {
        dispatch!(self, c => c.capacity())
    }

    fn kind(&self) -> StrategyKind {
        dispatch!(self, c => c.kind())
    }
}
