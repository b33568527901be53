//! Bounded reference history ring buffer.
//!
//! Stores the last `K` logical timestamps of one cache entry, where `K` is
//! chosen at runtime by the LRU-K strategy. Recording is O(1) and the K-th most
//! recent timestamp is O(1) to read, which is all an LRU-K ranking needs.
//!
//! ## Architecture
//!
//! ```text
//!   ReferenceHistory (k = 4) after recording 10, 20, 30, 40, 50
//!
//!   Index:     0     1     2     3
//!            ┌─────┬─────┬─────┬─────┐
//!   data:    │ 50  │ 20  │ 30  │ 40  │
//!            └─────┴─────┴─────┴─────┘
//!              ▲
//!           cursor = 1 (next write goes here)
//!
//!   kth_most_recent(n) = data[(cursor + k - n) % k]
//!     n=1 → 50, n=2 → 40, n=3 → 30, n=4 → 20
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use plancache::ds::ReferenceHistory;
//!
//! let mut history = ReferenceHistory::new(3);
//! history.record(100);
//! history.record(200);
//! assert!(!history.is_full());
//! assert_eq!(history.kth_most_recent(3), None);
//!
//! history.record(300);
//! history.record(400);
//! assert_eq!(history.kth_most_recent(3), Some(200));
//! assert_eq!(history.to_vec_mru(), vec![400, 300, 200]);
//! ```
//!
//! ## Implementation Notes
//!
//! - Backed by a boxed slice sized once at construction
//! - A depth of zero is accepted and records nothing; LRU-K rejects `k == 0`
//!   before building one
//! - `debug_validate_invariants()` available in debug/test builds

/// Ring buffer of the last `k` reference timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceHistory {
    data: Box<[u64]>,
    len: usize,
    cursor: usize,
}

impl ReferenceHistory {
    /// Creates an empty history retaining up to `k` timestamps.
    pub fn new(k: usize) -> Self {
        Self {
            data: vec![0; k].into_boxed_slice(),
            len: 0,
            cursor: 0,
        }
    }

    /// Maximum number of timestamps retained.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of timestamps currently retained.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` once `k` timestamps are retained.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.data.len()
    }

    /// Records a timestamp, overwriting the oldest when full.
    pub fn record(&mut self, timestamp: u64) {
        let k = self.data.len();
        if k == 0 {
            return;
        }
        self.data[self.cursor] = timestamp;
        self.cursor = (self.cursor + 1) % k;
        if self.len < k {
            self.len += 1;
        }
    }

    /// Returns the most recent timestamp.
    #[inline]
    pub fn most_recent(&self) -> Option<u64> {
        self.kth_most_recent(1)
    }

    /// Returns the `n`-th most recent timestamp (1-based).
    pub fn kth_most_recent(&self, n: usize) -> Option<u64> {
        if n == 0 || n > self.len {
            return None;
        }
        let k = self.data.len();
        Some(self.data[(self.cursor + k - n) % k])
    }

    /// Iterates timestamps from most recent to oldest.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        (1..=self.len).filter_map(move |n| self.kth_most_recent(n))
    }

    /// Collects retained timestamps, most recent first.
    pub fn to_vec_mru(&self) -> Vec<u64> {
        self.iter().collect()
    }

    /// Forgets every recorded timestamp.
    pub fn clear(&mut self) {
        self.len = 0;
        self.cursor = 0;
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        let k = self.data.len();
        assert!(self.len <= k);
        if k == 0 {
            assert_eq!(self.cursor, 0);
        } else {
            assert!(self.cursor < k);
        }
        let mru = self.to_vec_mru();
        assert!(
            mru.windows(2).all(|w| w[0] >= w[1]),
            "timestamps must be recorded in non-decreasing order"
        );
    }
}
