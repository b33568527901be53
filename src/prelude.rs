pub use crate::cache::QueryCache;
#[cfg(feature = "concurrency")]
pub use crate::concurrent::ConcurrentQueryCache;
pub use crate::config::CacheConfig;
pub use crate::error::CacheError;
pub use crate::policy::gdfs::GdfsCache;
pub use crate::policy::gds::GdsCache;
pub use crate::policy::lru::LruCache;
pub use crate::policy::lru_k::LrukCache;
pub use crate::policy::random::RandomCache;
pub use crate::policy::{Strategy, StrategyKind};
pub use crate::registry::{CacheRegistry, Outcome};
pub use crate::stats::CacheStats;
pub use crate::traits::{ConcurrentCache, EvictionStrategy};
pub use crate::workload::{Plan, PlanProducer, QueryKey, ReplaySummary};
