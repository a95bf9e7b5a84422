//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Cache performance counters and aggregates.
///
/// The hit/miss/eviction counters are monotonic and survive `clear()`;
/// `total_entries` and `total_bytes` describe the cache at snapshot time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of reads served from cache
    pub hits: u64,
    /// Number of reads that fell through to disk
    pub misses: u64,
    /// Number of entries removed by eviction, staleness, or expiry
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Current bytes of cached content
    pub total_bytes: usize,
    /// hits / (hits + misses), filled in when a snapshot is taken
    pub hit_rate: f64,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}
