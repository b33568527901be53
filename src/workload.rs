//! Query keys, plan producers and trace replay.
//!
//! The cache never plans anything itself. A [`PlanProducer`] stands in for
//! the planner: given a key it returns the plan together with its cost
//! (planning time) and size (token count). [`replay`] pushes a trace of keys
//! through a [`CacheRegistry`] and totals what each strategy paid.
//!
//! ## Example Usage
//!
//! ```rust
//! use plancache::registry::CacheRegistry;
//! use plancache::workload::{Plan, QueryKey, replay};
//!
//! let trace: Vec<String> = [1, 2, 1, 3, 1, 2]
//!     .into_iter()
//!     .map(|q| QueryKey::new("tpch", q).to_string())
//!     .collect();
//! assert_eq!(trace[0], "tpch__1");
//!
//! let mut registry = CacheRegistry::standard_lineup(2, 1).unwrap();
//! let mut planner = |key: &String| Plan::new(key.clone(), 10.0, 25.0);
//! let summary = replay(&mut registry, trace, &mut planner).unwrap();
//!
//! let lru = &summary["LRU"];
//! assert_eq!(lru.hits + lru.misses, 6);
//! assert_eq!(lru.cost_incurred, 10.0 * lru.misses as f64);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};
use crate::registry::CacheRegistry;

/// Separator between workload and query id in a rendered key.
pub const KEY_SEPARATOR: &str = "__";

/// Identifies one query of one benchmark workload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryKey {
    pub workload: String,
    pub query: usize,
}

impl QueryKey {
    pub fn new(workload: impl Into<String>, query: usize) -> Self {
        Self {
            workload: workload.into(),
            query,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.workload, self.query)
    }
}

impl FromStr for QueryKey {
    type Err = CacheError;

    /// Parses `"<workload>__<query>"`; the workload may itself contain `__`.
    fn from_str(s: &str) -> Result<Self> {
        let (workload, query) = s
            .rsplit_once(KEY_SEPARATOR)
            .ok_or_else(|| CacheError::invalid(format!("query key '{s}' has no '__'")))?;
        let query = query
            .parse()
            .map_err(|_| CacheError::invalid(format!("query id in '{s}' is not a number")))?;
        if workload.is_empty() {
            return Err(CacheError::invalid(format!("query key '{s}' has no workload")));
        }
        Ok(Self::new(workload, query))
    }
}

/// A produced plan with the weights the cache scores it by.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan<V> {
    pub value: V,
    /// Planning time.
    pub cost: f64,
    /// Token count.
    pub size: f64,
}

impl<V> Plan<V> {
    pub fn new(value: V, cost: f64, size: f64) -> Self {
        Self { value, cost, size }
    }
}

/// Source of plans for keys that missed.
pub trait PlanProducer<K, V> {
    fn produce(&mut self, key: &K) -> Plan<V>;
}

impl<K, V, F> PlanProducer<K, V> for F
where
    F: FnMut(&K) -> Plan<V>,
{
    fn produce(&mut self, key: &K) -> Plan<V> {
        self(key)
    }
}

/// Fixed table of plans, e.g. loaded from benchmark metadata.
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog<K, V> {
    plans: BTreeMap<K, Plan<V>>,
}

impl<K, V> PlanCatalog<K, V>
where
    K: Ord,
{
    pub fn new() -> Self {
        Self {
            plans: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: K, plan: Plan<V>) {
        self.plans.insert(key, plan);
    }

    pub fn get(&self, key: &K) -> Option<&Plan<V>> {
        self.plans.get(key)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl<K, V> FromIterator<(K, Plan<V>)> for PlanCatalog<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, Plan<V>)>>(iter: I) -> Self {
        Self {
            plans: iter.into_iter().collect(),
        }
    }
}

/// Catalog lookups for unknown keys yield a zero-cost unit-size plan of
/// `V::default()` and log a warning, since a replay then under-reports cost.
impl<K, V> PlanProducer<K, V> for PlanCatalog<K, V>
where
    K: Ord + fmt::Debug,
    V: Clone + Default,
{
    fn produce(&mut self, key: &K) -> Plan<V> {
        match self.plans.get(key) {
            Some(plan) => plan.clone(),
            None => {
                tracing::warn!(?key, "no catalog plan for key, using zero-cost default");
                Plan::new(V::default(), 0.0, 1.0)
            }
        }
    }
}

/// Per-strategy totals of one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Sum of producer cost over misses.
    pub cost_incurred: f64,
}

impl ReplaySummary {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Executes every key of `trace` against every façade of `registry`.
///
/// Stops at the first rejected plan; façades keep what earlier keys did.
pub fn replay<K, V, P, I>(
    registry: &mut CacheRegistry<K, V>,
    trace: I,
    producer: &mut P,
) -> Result<BTreeMap<String, ReplaySummary>>
where
    K: Eq + Hash + Clone,
    V: Clone,
    P: PlanProducer<K, V> + ?Sized,
    I: IntoIterator<Item = K>,
{
    let mut summaries: BTreeMap<String, ReplaySummary> = registry
        .names()
        .map(|name| (name.to_string(), ReplaySummary::default()))
        .collect();
    let mut steps = 0usize;

    for key in trace {
        for (name, outcome) in registry.execute(key, producer)? {
            let summary = summaries.entry(name).or_default();
            if outcome.hit {
                summary.hits += 1;
            } else {
                summary.misses += 1;
            }
            if outcome.evicted.is_some() {
                summary.evictions += 1;
            }
            summary.cost_incurred += outcome.cost_incurred;
        }
        steps += 1;
    }

    tracing::info!(steps, strategies = summaries.len(), "replayed trace");
    Ok(summaries)
}
