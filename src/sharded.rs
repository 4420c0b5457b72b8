//! Lock-striped cache made of independent [`Cache`] shards.
//!
//! Each key lives in exactly one shard chosen by a [`ShardSelector`], so
//! operations on keys in different shards never contend. Limits are split so
//! the shard limits sum to exactly the configured totals: every shard gets
//! `max_size_item / shards` entries and the first `max_size_item % shards`
//! shards get one more. `max_memory` is divided the same way. A shard count
//! that would leave a shard with a zero limit is rejected. Eviction and expiry
//! are per shard, not global.
//!
//! Multi-key views (`keys`, `len`, `stats`) visit the shards one at a time and
//! are not an atomic snapshot of the whole cache.

use std::fmt;

use crate::cache::Cache;
use crate::clock::SharedClock;
use crate::config::CacheOptions;
use crate::document::Document;
use crate::ds::ShardSelector;
use crate::error::{CacheError, Result};
use crate::stats::CacheStats;
use crate::weigher::SharedWeigher;

const SHARD_SEED: u64 = 0x5eed_cafe;

pub struct ShardedCache<V> {
    shards: Vec<Cache<V>>,
    selector: ShardSelector,
    options: CacheOptions,
}

impl<V> ShardedCache<V> {
    pub(crate) fn from_parts(
        options: CacheOptions,
        shards: usize,
        weigher: Option<SharedWeigher<V>>,
        clock: SharedClock,
    ) -> Result<Self> {
        options.validate()?;
        if shards == 0 {
            return Err(CacheError::invalid_config("shard count must be > 0"));
        }
        if shards > options.max_size_item {
            return Err(CacheError::invalid_config(format!(
                "shard count {shards} exceeds max_size_item {}",
                options.max_size_item
            )));
        }
        // A zero share would turn into an unbounded shard.
        if options.max_memory > 0 && options.max_memory < shards as u64 {
            return Err(CacheError::invalid_config(format!(
                "shard count {shards} exceeds max_memory {}",
                options.max_memory
            )));
        }

        let shards = (0..shards)
            .map(|index| {
                let per_shard = CacheOptions {
                    max_size_item: share(options.max_size_item as u64, shards, index) as usize,
                    max_memory: share(options.max_memory, shards, index),
                    ..options.clone()
                };
                Cache::from_parts(per_shard, weigher.clone(), SharedClock::clone(&clock))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            selector: ShardSelector::new(shards.len(), SHARD_SEED),
            shards,
            options,
        })
    }

    #[inline]
    fn shard(&self, key: &str) -> &Cache<V> {
        &self.shards[self.selector.shard_for_key(key)]
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Index of the shard that owns `key`.
    pub fn shard_for_key(&self, key: &str) -> usize {
        self.selector.shard_for_key(key)
    }

    /// Options as given at construction, before splitting.
    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    pub fn set(&self, key: impl Into<String>, value: V) -> Result<()> {
        let key = key.into();
        self.shard(&key).set(key, value)
    }

    pub fn get(&self, key: &str) -> Result<V>
    where
        V: Clone,
    {
        self.shard(key).get(key)
    }

    pub fn get_with<R>(&self, key: &str, f: impl FnOnce(&V) -> R) -> Result<R> {
        self.shard(key).get_with(key, f)
    }

    pub fn get_document(&self, key: &str) -> Result<Document<V>>
    where
        V: Clone,
    {
        self.shard(key).get_document(key)
    }

    pub fn peek(&self, key: &str) -> Result<V>
    where
        V: Clone,
    {
        self.shard(key).peek(key)
    }

    pub fn delete(&self, key: &str) -> bool {
        self.shard(key).delete(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.shard(key).contains(key)
    }

    /// Concatenation of every shard's key snapshot, shard 0 first.
    pub fn keys(&self) -> Vec<String> {
        self.shards.iter().flat_map(Cache::keys).collect()
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            shard.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(Cache::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(Cache::is_empty)
    }

    pub fn memory_usage(&self) -> u64 {
        self.shards.iter().map(Cache::memory_usage).sum()
    }

    pub fn stats(&self) -> CacheStats {
        let mut total = CacheStats::default();
        for shard in &self.shards {
            total += shard.stats();
        }
        total
    }
}

/// Portion of `total` owned by shard `index` out of `shards`.
fn share(total: u64, shards: usize, index: usize) -> u64 {
    let shards = shards as u64;
    total / shards + u64::from((index as u64) < total % shards)
}

impl<V> fmt::Debug for ShardedCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedCache")
            .field("shards", &self.shards.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
