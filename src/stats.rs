//! Hit/miss counters kept by each [`QueryCache`](crate::cache::QueryCache).
//!
//! Counters are plain `u64`s updated under the façade's `&mut self`; the
//! concurrent wrapper reads them through its lock. They reset when the
//! strategy is replaced and on [`QueryCache::reset_stats`](crate::cache::QueryCache::reset_stats).

use serde::Serialize;

/// Operation counters for one façade.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// `set` calls that placed a new key.
    pub inserts: u64,
    /// `set` calls that overwrote a live key.
    pub updates: u64,
    /// Entries evicted by `set` or `resize`.
    pub evictions: u64,
    /// Entries removed explicitly.
    pub removals: u64,
}

impl CacheStats {
    #[inline]
    pub(crate) fn record_lookup(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    #[inline]
    pub(crate) fn record_set(&mut self, updated: bool, evicted: bool) {
        if updated {
            self.updates += 1;
        } else {
            self.inserts += 1;
        }
        if evicted {
            self.evictions += 1;
        }
    }

    /// Total `try_get` calls.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that hit, `0.0` before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.lookups();
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}
