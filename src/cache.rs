//! Thread-safe cache facade.
//!
//! [`Cache`] owns exactly one eviction engine behind a
//! [`parking_lot::RwLock`]. Every operation that can change the ranking
//! structures takes the write half, including `get`: a hit bumps recency or
//! frequency, and an expired entry is purged on the spot. Only side-effect
//! free queries (`keys`, `contains`, `len`, counters) share the read half.
//!
//! ```text
//!   thread A ── set ──┐
//!   thread B ── get ──┼──► RwLock::write ──► Engine::{Lru, Lfu} ──► Repository
//!   thread C ── del ──┘
//!   thread D ── keys ─────► RwLock::read  ──┘
//! ```
//!
//! Documents are stamped with the cache's [`Clock`](crate::clock::Clock) on
//! `set`, and the same clock drives expiry.
//!
//! ## Example
//!
//! ```
//! use stashkit::{Cache, CacheOptions, Strategy};
//!
//! let cache: Cache<String> = Cache::new(CacheOptions::default().with_strategy(Strategy::Lfu)).unwrap();
//! cache.set("name", "John Snow".to_string()).unwrap();
//! assert_eq!(cache.get("name").unwrap(), "John Snow");
//!
//! assert!(cache.delete("name"));
//! assert!(cache.get("name").unwrap_err().is_not_found());
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::info;

use crate::builder::CacheBuilder;
use crate::clock::{self, SharedClock};
use crate::config::{CacheOptions, Strategy};
use crate::document::Document;
use crate::error::{CacheError, InvariantError, Result};
use crate::policy::{LfuRepository, LruRepository};
use crate::repository::Repository;
use crate::stats::CacheStats;
use crate::weigher::{SerializedSize, SharedWeigher};

/// The engine selected at construction.
pub(crate) enum Engine<V> {
    Lru(LruRepository<V>),
    Lfu(LfuRepository<V>),
}

impl<V> Engine<V> {
    fn build(
        options: &CacheOptions,
        weigher: Option<SharedWeigher<V>>,
        clock: SharedClock,
    ) -> Result<Self> {
        let engine = match options.strategy {
            Strategy::Lru => {
                let mut repo =
                    LruRepository::new(options.max_size_item, options.expiry)?.with_clock(clock);
                if let Some(weigher) = weigher {
                    repo = repo.with_memory_limit(options.max_memory, weigher);
                }
                Self::Lru(repo)
            },
            Strategy::Lfu => {
                let mut repo =
                    LfuRepository::new(options.max_size_item, options.expiry)?.with_clock(clock);
                if let Some(weigher) = weigher {
                    repo = repo.with_memory_limit(options.max_memory, weigher);
                }
                Self::Lfu(repo)
            },
        };
        Ok(engine)
    }

    fn repository(&self) -> &dyn Repository<V> {
        match self {
            Self::Lru(repo) => repo,
            Self::Lfu(repo) => repo,
        }
    }

    fn repository_mut(&mut self) -> &mut dyn Repository<V> {
        match self {
            Self::Lru(repo) => repo,
            Self::Lfu(repo) => repo,
        }
    }
}

/// A locked key/value cache with LRU or LFU eviction.
pub struct Cache<V> {
    engine: RwLock<Engine<V>>,
    clock: SharedClock,
    options: CacheOptions,
}

impl<V> Cache<V>
where
    V: Serialize,
{
    /// Builds a cache whose memory bound is measured with [`SerializedSize`].
    pub fn new(options: CacheOptions) -> Result<Self> {
        Self::from_parts(options, Some(Arc::new(SerializedSize)), clock::system())
    }
}

impl<V> Cache<V> {
    pub fn builder() -> CacheBuilder<V> {
        CacheBuilder::new()
    }

    pub(crate) fn from_parts(
        options: CacheOptions,
        weigher: Option<SharedWeigher<V>>,
        clock: SharedClock,
    ) -> Result<Self> {
        options.validate()?;
        if options.max_memory > 0 && weigher.is_none() {
            return Err(CacheError::invalid_config(
                "max_memory is set but no weigher was provided",
            ));
        }

        let engine = Engine::build(&options, weigher, Arc::clone(&clock))?;
        info!(
            strategy = %options.strategy,
            max_size_item = options.max_size_item,
            max_memory = options.max_memory,
            expiry = ?options.expiry,
            "cache created"
        );
        Ok(Self {
            engine: RwLock::new(engine),
            clock,
            options,
        })
    }

    /// Stores `value` under `key`, stamped with the current time.
    ///
    /// Storing an existing key replaces its value and timestamp. With a
    /// memory bound, a weigher error removes `key` and is returned as is.
    pub fn set(&self, key: impl Into<String>, value: V) -> Result<()> {
        let document = Document::new(key, value, self.clock.now());
        self.engine.write().repository_mut().set(document)
    }

    /// Returns a clone of the live value for `key` and records the access.
    pub fn get(&self, key: &str) -> Result<V>
    where
        V: Clone,
    {
        self.get_with(key, V::clone)
    }

    /// Like [`get`](Self::get) but maps the value in place instead of cloning.
    pub fn get_with<R>(&self, key: &str, f: impl FnOnce(&V) -> R) -> Result<R> {
        let mut engine = self.engine.write();
        let document = engine.repository_mut().get(key)?;
        Ok(f(&document.value))
    }

    /// Returns the full document for `key` and records the access.
    pub fn get_document(&self, key: &str) -> Result<Document<V>>
    where
        V: Clone,
    {
        let mut engine = self.engine.write();
        engine.repository_mut().get(key).cloned()
    }

    /// Returns the live value for `key` without affecting eviction order.
    ///
    /// Still takes the write lock since an expired entry is purged.
    pub fn peek(&self, key: &str) -> Result<V>
    where
        V: Clone,
    {
        let mut engine = self.engine.write();
        let document = engine.repository_mut().peek(key)?;
        Ok(document.value.clone())
    }

    /// Removes `key`; returns whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        self.engine.write().repository_mut().delete(key)
    }

    /// Snapshot of the indexed keys. May include entries that have expired
    /// but were not yet looked up.
    pub fn keys(&self) -> Vec<String> {
        self.engine.read().repository().keys()
    }

    pub fn clear(&self) {
        self.engine.write().repository_mut().clear();
    }

    /// Point-in-time membership. Does not evaluate expiry.
    pub fn contains(&self, key: &str) -> bool {
        self.engine.read().repository().contains(key)
    }

    pub fn len(&self) -> usize {
        self.engine.read().repository().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Summed weigher cost of live entries; zero without a memory bound.
    pub fn memory_usage(&self) -> u64 {
        self.engine.read().repository().memory_usage()
    }

    pub fn stats(&self) -> CacheStats {
        self.engine.read().repository().stats()
    }

    pub fn strategy(&self) -> Strategy {
        self.options.strategy
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Recorded frequency of `key` under LFU; `None` for LRU or absent keys.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        match &*self.engine.read() {
            Engine::Lfu(repo) => repo.frequency(key),
            Engine::Lru(_) => None,
        }
    }

    /// Runs the engine's structural consistency checks.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        match &*self.engine.read() {
            Engine::Lru(repo) => repo.check_invariants(),
            Engine::Lfu(repo) => repo.check_invariants(),
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("cache invariant violated: {err}");
        }
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("options", &self.options)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
