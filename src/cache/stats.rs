//! Cache Statistics Module
//!
//! Hit/miss/eviction counters and the derived hit rate.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance counters, serialized as-is by `/api/cache/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Current number of entries, including expired ones not yet reaped
    pub size: usize,
    /// Lookups that found a valid entry
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries removed to make room for new keys
    pub evictions: u64,
    /// `hits / (hits + misses) * 100`, 0 before any lookup
    pub hit_rate: f64,
}

/// Running counters owned by the store.
#[derive(Debug, Clone, Default)]
pub(crate) struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl Counters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // == Snapshot ==
    /// Builds a [`CacheStats`] for the given entry count.
    pub fn snapshot(&self, size: usize) -> CacheStats {
        CacheStats {
            size,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            hit_rate: hit_rate(self.hits, self.misses),
        }
    }
}

// == Hit Rate ==
/// Percentage of lookups that were hits; 0.0 when there were none.
pub fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64 * 100.0
    }
}
