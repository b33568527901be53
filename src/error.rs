//! Error types for the plancache library.
//!
//! ## Key Components
//!
//! - [`CacheError`]: Returned when a caller supplies an invalid parameter
//!   (zero capacity, zero K, non-positive size) or names a strategy that a
//!   registry does not hold.
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (debug-only `check_invariants` methods).
//!
//! ## Example Usage
//!
//! ```
//! use plancache::error::CacheError;
//! use plancache::policy::gds::GdsCache;
//! use plancache::traits::EvictionStrategy;
//!
//! let mut cache: GdsCache<&str, &str> = GdsCache::try_new(4).unwrap();
//!
//! // GreedyDual-Size divides by size, so zero is rejected before any mutation
//! let err = cache.set("q1", "plan", 10.0, 0.0).unwrap_err();
//! assert!(matches!(err, CacheError::InvalidConfiguration(_)));
//! assert!(cache.is_empty());
//! ```

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Error returned by fallible cache operations.
///
/// Every variant is raised before the cache is mutated, so a failed call
/// leaves the cache exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A parameter failed validation (capacity, K, cost, size, strategy name).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A registry lookup named a strategy that is not registered.
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    /// A registry already holds a strategy under this name.
    #[error("strategy already registered: {0}")]
    DuplicateStrategy(String),
}

impl CacheError {
    /// Shorthand for [`CacheError::InvalidConfiguration`].
    #[inline]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Rejects a zero capacity.
pub(crate) fn validate_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        tracing::warn!(capacity, "rejected cache capacity");
        return Err(CacheError::invalid("capacity must be > 0"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by debug-only `check_invariants` methods on strategy types
/// (e.g. [`LruCache::check_invariants`](crate::policy::lru::LruCache::check_invariants)).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
