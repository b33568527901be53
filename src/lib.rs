//! plancache: a query-plan cache with swappable eviction strategies.
//!
//! A [`QueryCache`](cache::QueryCache) stores produced plans keyed by query
//! and evicts by one of LRU, LRU-K, GDS, GDFS or Random. The strategy and the
//! capacity can be changed at runtime; a [`CacheRegistry`](registry::CacheRegistry)
//! runs several façades side by side over the same workload.

pub mod cache;
#[cfg(feature = "concurrency")]
pub mod concurrent;
pub mod config;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod registry;
pub mod stats;
pub mod store;
pub mod traits;
pub mod workload;
