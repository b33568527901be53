//! GreedyDual-Size (GDS) strategy.
//!
//! Priority `H = cost / size + L`. Expensive, small plans stay; cheap, large
//! plans go first. See [`greedy_dual`](crate::policy::greedy_dual) for the
//! shared baseline and eviction rules.
//!
//! ## Example Usage
//!
//! ```
//! use plancache::policy::gds::GdsCache;
//! use plancache::traits::EvictionStrategy;
//!
//! let mut cache = GdsCache::try_new(2).unwrap();
//! cache.set("cheap", "p1", 1.0, 1.0).unwrap(); // H = 1
//! cache.set("pricey", "p2", 9.0, 1.0).unwrap(); // H = 9
//!
//! assert_eq!(cache.set("new", "p3", 4.0, 2.0).unwrap(), Some("cheap"));
//! assert_eq!(cache.baseline(), 1.0);
//! assert_eq!(cache.priority(&"new"), Some(3.0)); // 4/2 + L
//! ```

use crate::policy::StrategyKind;
use crate::policy::greedy_dual::{GreedyDualCache, PriorityWeight};

/// `cost / size` weighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeCost;

impl PriorityWeight for SizeCost {
    const KIND: StrategyKind = StrategyKind::Gds;

    #[inline]
    fn weight(cost: f64, size: f64, _frequency: u64) -> f64 {
        cost / size
    }
}

/// GreedyDual-Size cache.
pub type GdsCache<K, V> = GreedyDualCache<K, V, SizeCost>;
