//! Deterministic key-to-shard mapping for [`ShardedCache`](crate::ShardedCache).
//!
//! ```text
//!   "user:42" ──► FxHasher(seed, key) ──► finish() % shards ──► shard 2
//!
//!   ┌─────────┬─────────┬─────────┬─────────┐
//!   │ Shard 0 │ Shard 1 │ Shard 2 │ Shard 3 │
//!   │ Cache   │ Cache   │ Cache   │ Cache   │
//!   └─────────┴─────────┴─────────┴─────────┘
//! ```
//!
//! The same `(key, seed, shards)` always yields the same shard. Different
//! seeds give different distributions.
//!
//! ```
//! use stashkit::ds::ShardSelector;
//!
//! let selector = ShardSelector::new(4, 0);
//! let shard = selector.shard_for_key("user:123");
//! assert!(shard < 4);
//! assert_eq!(selector.shard_for_key("user:123"), shard);
//! ```

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// Seeded shard selector over string keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardSelector {
    shards: usize,
    seed: u64,
}

impl ShardSelector {
    /// Creates a selector for `shards` shards; zero is clamped to one.
    pub fn new(shards: usize, seed: u64) -> Self {
        Self {
            shards: shards.max(1),
            seed,
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Maps `key` to a shard index in `[0, shards)`.
    #[inline]
    pub fn shard_for_key(&self, key: &str) -> usize {
        if self.shards == 1 {
            return 0;
        }
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        key.hash(&mut hasher);
        (hasher.finish() % self.shards as u64) as usize
    }
}

impl Default for ShardSelector {
    /// Single shard, seed 0.
    fn default() -> Self {
        Self::new(1, 0)
    }
}
