//! Cache Statistics Module
//!
//! Tracks cache lookups, writes and storage failures.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered by a live entry
    pub hits: u64,
    /// Lookups with no live entry (absent or expired)
    pub misses: u64,
    /// Successful entry writes
    pub writes: u64,
    /// Entry writes that could not be persisted
    pub write_failures: u64,
    /// Blob reads that failed or could not be parsed
    pub read_failures: u64,
    /// Entries removed by expiry sweeps
    pub swept: u64,
    /// Entries currently persisted, live or not
    pub total_entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Counters ==
/// Shared counters behind a `CacheStats` snapshot.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    write_failures: AtomicU64,
    read_failures: AtomicU64,
    swept: AtomicU64,
}

impl StatsCounters {
    pub fn record_hits(&self, count: u64) {
        self.hits.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_misses(&self, count: u64) {
        self.misses.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_read_failure(&self) {
        self.read_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_swept(&self, count: u64) {
        self.swept.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self, total_entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            read_failures: self.read_failures.load(Ordering::Relaxed),
            swept: self.swept.load(Ordering::Relaxed),
            total_entries,
        }
    }
}
