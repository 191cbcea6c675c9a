//! Fetch Statistics Module
//!
//! Tracks fetch cache efficiency: hits, misses and collaborator failures.
//! Demand is tracked separately by the per-URL access counters.

use serde::Serialize;

// == Fetch Stats ==
/// Fetch cache performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchStats {
    /// Fetches answered from a live cached payload
    pub hits: u64,
    /// Fetches that had to call the collaborator
    pub misses: u64,
    /// Collaborator calls that failed
    pub failures: u64,
}

impl FetchStats {
    // == Constructor ==
    /// Creates a new FetchStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if nothing has been fetched.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }
}
