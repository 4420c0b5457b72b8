//! Cache construction.
//!
//! [`CacheBuilder`] gathers [`CacheOptions`], an optional [`Weigher`] and an
//! optional [`Clock`], then wires them into a [`Cache`] or a
//! [`ShardedCache`].
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use stashkit::{CacheBuilder, Strategy};
//!
//! let cache = CacheBuilder::<String>::new()
//!     .strategy(Strategy::Lru)
//!     .max_size_item(1_000)
//!     .expiry(Duration::from_secs(30))
//!     .with_serialized_size()
//!     .try_build()
//!     .unwrap();
//!
//! cache.set("hello", "world".to_string()).unwrap();
//! assert_eq!(cache.get("hello").unwrap(), "world");
//! ```
//!
//! ## Memory bound
//!
//! The default options carry a 10 MiB memory budget. A budget needs a
//! weigher: call [`with_serialized_size`](CacheBuilder::with_serialized_size)
//! for `Serialize` values, pass a custom [`weigher`](CacheBuilder::weigher),
//! or set `max_memory(0)`. Building with a budget and no weigher fails with
//! [`CacheError::InvalidConfiguration`](crate::CacheError::InvalidConfiguration).

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::cache::Cache;
use crate::clock::{self, Clock, SharedClock};
use crate::config::{CacheOptions, Strategy};
use crate::error::Result;
use crate::sharded::ShardedCache;
use crate::weigher::{SerializedSize, SharedWeigher, Weigher};

/// Builder for [`Cache`] and [`ShardedCache`].
pub struct CacheBuilder<V> {
    options: CacheOptions,
    weigher: Option<SharedWeigher<V>>,
    clock: Option<SharedClock>,
}

impl<V> CacheBuilder<V> {
    /// Starts from [`CacheOptions::default`].
    pub fn new() -> Self {
        Self::from_options(CacheOptions::default())
    }

    pub fn from_options(options: CacheOptions) -> Self {
        Self {
            options,
            weigher: None,
            clock: None,
        }
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.options.strategy = strategy;
        self
    }

    /// Zero disables expiry.
    pub fn expiry(mut self, expiry: Duration) -> Self {
        self.options.expiry = expiry;
        self
    }

    pub fn max_size_item(mut self, max_size_item: usize) -> Self {
        self.options.max_size_item = max_size_item;
        self
    }

    /// Zero disables the memory bound.
    pub fn max_memory(mut self, max_memory: u64) -> Self {
        self.options.max_memory = max_memory;
        self
    }

    pub fn weigher(mut self, weigher: impl Weigher<V> + 'static) -> Self {
        self.weigher = Some(Arc::new(weigher));
        self
    }

    pub fn shared_weigher(mut self, weigher: SharedWeigher<V>) -> Self {
        self.weigher = Some(weigher);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn shared_clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    pub fn try_build(self) -> Result<Cache<V>> {
        let clock = self.clock.unwrap_or_else(clock::system);
        Cache::from_parts(self.options, self.weigher, clock)
    }

    /// Builds `shards` independent caches, splitting the limits between them.
    ///
    /// Fails when `shards` is larger than `max_size_item`, or larger than a
    /// non-zero `max_memory`.
    pub fn build_sharded(self, shards: usize) -> Result<ShardedCache<V>> {
        let clock = self.clock.unwrap_or_else(clock::system);
        ShardedCache::from_parts(self.options, shards, self.weigher, clock)
    }
}

impl<V> CacheBuilder<V>
where
    V: Serialize,
{
    /// Weighs documents by their JSON encoding length.
    pub fn with_serialized_size(self) -> Self {
        self.weigher(SerializedSize)
    }
}

impl<V> Default for CacheBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}
