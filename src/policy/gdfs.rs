//! GreedyDual-Size-Frequency (GDFS) strategy.
//!
//! Priority `H = freq · cost / size + L`, where `freq` starts at 1 and grows
//! by one on every hit and re-set. Popular plans outlive equally expensive
//! ones that were used once.
//!
//! ## Example Usage
//!
//! ```
//! use plancache::policy::gdfs::GdfsCache;
//! use plancache::traits::EvictionStrategy;
//!
//! let mut cache = GdfsCache::try_new(2).unwrap();
//! cache.set("x", (), 2.0, 1.0).unwrap();
//! cache.set("y", (), 2.0, 1.0).unwrap();
//! cache.try_get(&"x");
//!
//! assert_eq!(cache.frequency(&"x"), Some(2));
//! assert_eq!(cache.priority(&"x"), Some(4.0));
//! assert_eq!(cache.set("z", (), 2.0, 1.0).unwrap(), Some("y"));
//! ```

use std::hash::Hash;

use crate::policy::StrategyKind;
use crate::policy::greedy_dual::{GreedyDualCache, PriorityWeight};

/// `freq · cost / size` weighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencySizeCost;

impl PriorityWeight for FrequencySizeCost {
    const KIND: StrategyKind = StrategyKind::Gdfs;

    #[inline]
    fn weight(cost: f64, size: f64, frequency: u64) -> f64 {
        frequency as f64 * cost / size
    }
}

/// GreedyDual-Size-Frequency cache.
pub type GdfsCache<K, V> = GreedyDualCache<K, V, FrequencySizeCost>;

impl<K, V> GreedyDualCache<K, V, FrequencySizeCost>
where
    K: Eq + Hash + Clone,
{
    /// Reference count of `key`.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.references(key)
    }
}
