//! Operation counters kept by each repository.
//!
//! Counters are plain integers mutated under the facade lock; readers receive
//! a copy.

use std::ops::AddAssign;

use serde::Serialize;

/// Snapshot of repository counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Successful `get` calls.
    pub hits: u64,
    /// `get` calls on absent keys (expired hits are counted under `expirations`).
    pub misses: u64,
    /// Entries purged lazily because they outlived the expiry threshold.
    pub expirations: u64,
    /// Entries removed to satisfy the size or memory bound.
    pub evictions: u64,
    /// `set` calls that created a new entry.
    pub inserts: u64,
    /// `set` calls that replaced an existing entry.
    pub updates: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit, or `0.0` when nothing was looked up.
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses + self.expirations;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

impl AddAssign for CacheStats {
    fn add_assign(&mut self, rhs: Self) {
        self.hits += rhs.hits;
        self.misses += rhs.misses;
        self.expirations += rhs.expirations;
        self.evictions += rhs.evictions;
        self.inserts += rhs.inserts;
        self.updates += rhs.updates;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_ratio_counts_expirations_as_lookups() {
        let stats = CacheStats {
            hits: 2,
            misses: 1,
            expirations: 1,
            ..CacheStats::default()
        };
        assert!((stats.hit_ratio() - 0.5).abs() < f64::EPSILON);
        assert_eq!(CacheStats::default().hit_ratio(), 0.0);
    }

    #[test]
    fn add_assign_sums_fields() {
        let mut total = CacheStats {
            hits: 1,
            evictions: 2,
            ..CacheStats::default()
        };
        total += CacheStats {
            hits: 3,
            inserts: 4,
            ..CacheStats::default()
        };
        assert_eq!(total.hits, 4);
        assert_eq!(total.evictions, 2);
        assert_eq!(total.inserts, 4);
    }
}
