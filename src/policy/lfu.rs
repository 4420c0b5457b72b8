//! # Least Frequently Used (LFU) repository
//!
//! Ranks entries by how many successful `get`s they received, using a sparse
//! ascending [`FrequencyChain`]. Eviction takes the member that joined the
//! lowest bucket first.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         LfuRepository<V>                             │
//!   │                                                                      │
//!   │   index: FxHashMap<String, SlotId>                                   │
//!   │   ┌──────────┬────────┐                                              │
//!   │   │ "page1"  │  id_0  │───────────────────────┐                      │
//!   │   │ "page2"  │  id_1  │───┐                   │                      │
//!   │   └──────────┴────────┘   │                   │                      │
//!   │                           ▼                   ▼                      │
//!   │   FrequencyChain    ┌──────────┐        ┌──────────┐                 │
//!   │   (lowest first)    │  freq 1  │ ◄────► │  freq 4  │                 │
//!   │                     │ [id_1]   │        │ [id_0]   │                 │
//!   │                     └──────────┘        └──────────┘                 │
//!   │                     victim bucket                                    │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frequency accounting
//!
//! - A new key enters the frequency-1 bucket.
//! - Every successful `get` moves it from `f` to `f + 1`, saturating at
//!   `u64::MAX`. `peek` never promotes.
//! - Re-setting a live key replaces its value and timestamp and keeps its
//!   frequency. It rejoins the back of its bucket.
//! - Expiry, deletion and eviction forget the frequency entirely.
//!
//! ## Victim selection
//!
//! The victim is the head of the lowest bucket, i.e. its earliest joiner, so
//! choosing it is O(1). New keys and refreshed keys join at the back of their
//! bucket stamped with the cache clock, so in the frequency-1 bucket the head
//! also carries the oldest `stored_at`. In higher buckets members are ordered
//! by when they were promoted, which need not match their stamps. Which member
//! of a bucket goes first is an implementation detail.
//!
//! ## Example Usage
//!
//! ```
//! use std::time::{Duration, SystemTime};
//!
//! use stashkit::document::Document;
//! use stashkit::policy::LfuRepository;
//! use stashkit::repository::Repository;
//!
//! let mut repo = LfuRepository::new(2, Duration::ZERO).unwrap();
//! let now = SystemTime::now();
//! repo.set(Document::new("hot", "a", now)).unwrap();
//! repo.set(Document::new("cold", "b", now)).unwrap();
//! repo.get("hot").unwrap();
//!
//! repo.set(Document::new("new", "c", now)).unwrap(); // evicts "cold"
//! assert_eq!(repo.frequency("hot"), Some(2));
//! assert!(!repo.contains("cold"));
//! ```

use std::fmt;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::clock::{self, SharedClock};
use crate::document::{Document, Entry, ExpiryPolicy};
use crate::ds::frequency_chain::FrequencyChain;
use crate::ds::slot_arena::SlotId;
use crate::error::{CacheError, InvariantError, Result};
use crate::policy::{EvictionReason, validate_max_size_item};
use crate::repository::Repository;
use crate::stats::CacheStats;
use crate::weigher::{MemoryBudget, SharedWeigher};

pub struct LfuRepository<V> {
    chain: FrequencyChain<Entry<V>>,
    index: FxHashMap<String, SlotId>,
    max_size_item: usize,
    expiry: ExpiryPolicy,
    budget: MemoryBudget<V>,
    clock: SharedClock,
    stats: CacheStats,
}

impl<V> LfuRepository<V> {
    /// Creates an unbounded-memory repository.
    ///
    /// `expiry` of zero disables expiry. Fails with
    /// [`CacheError::InvalidConfiguration`] when `max_size_item` is zero.
    pub fn new(max_size_item: usize, expiry: Duration) -> Result<Self> {
        validate_max_size_item(max_size_item)?;
        Ok(Self {
            chain: FrequencyChain::with_capacity(max_size_item.min(1024)),
            index: FxHashMap::with_capacity_and_hasher(max_size_item.min(1024), Default::default()),
            max_size_item,
            expiry: ExpiryPolicy::new(expiry),
            budget: MemoryBudget::unbounded(),
            clock: clock::system(),
            stats: CacheStats::default(),
        })
    }

    /// Bounds the summed `weigher` cost of live entries by `max_memory`.
    ///
    /// A `max_memory` of zero leaves the repository unbounded.
    pub fn with_memory_limit(mut self, max_memory: u64, weigher: SharedWeigher<V>) -> Self {
        self.budget = MemoryBudget::new(max_memory, weigher);
        self
    }

    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn expiry(&self) -> ExpiryPolicy {
        self.expiry
    }

    /// Configured memory limit; zero means unbounded.
    pub fn max_memory(&self) -> u64 {
        self.budget.limit()
    }

    /// Recorded frequency of `key`: 1 plus the number of successful `get`s.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        let id = self.index.get(key)?;
        self.chain.frequency(*id)
    }

    /// The document that would be evicted next, if any.
    pub fn peek_lfu(&self) -> Option<&Document<V>> {
        let id = self.victim()?;
        self.chain.get(id).map(|entry| &entry.document)
    }

    /// Removes and returns the document that would be evicted next.
    pub fn pop_lfu(&mut self) -> Option<Document<V>> {
        let id = self.victim()?;
        self.remove_slot(id).map(|entry| entry.document)
    }

    #[inline]
    fn victim(&self) -> Option<SlotId> {
        self.chain.lowest_members().next().map(|(id, _)| id)
    }

    fn remove_slot(&mut self, id: SlotId) -> Option<Entry<V>> {
        let entry = self.chain.remove(id)?;
        self.index.remove(entry.document.key.as_str());
        self.budget.release(entry.cost);
        Some(entry)
    }

    fn evict_one(&mut self, reason: EvictionReason) -> bool {
        let frequency = self.chain.lowest_frequency();
        match self.pop_lfu() {
            Some(document) => {
                self.stats.evictions += 1;
                debug!(key = %document.key, ?frequency, %reason, "lfu evicted entry");
                true
            },
            None => false,
        }
    }

    fn lookup(&mut self, key: &str, record_access: bool) -> Result<&Document<V>> {
        let Some(id) = self.index.get(key).copied() else {
            if record_access {
                self.stats.misses += 1;
            }
            trace!(key, "lfu miss");
            return Err(CacheError::NotFound);
        };

        let now = self.clock.now();
        let expired = self
            .chain
            .get(id)
            .is_some_and(|entry| self.expiry.is_expired(&entry.document, now));
        if expired {
            self.remove_slot(id);
            self.stats.expirations += 1;
            trace!(key, "lfu purged expired entry");
            return Err(CacheError::NotFound);
        }

        if record_access {
            self.chain.promote(id);
            self.stats.hits += 1;
        }
        self.chain
            .get(id)
            .map(|entry| &entry.document)
            .ok_or(CacheError::NotFound)
    }

    /// Verifies that the index, the bucket chain and the budget agree.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        self.chain.check_invariants()?;
        if self.index.len() != self.chain.len() {
            return Err(InvariantError::new(format!(
                "index has {} keys but chain has {} members",
                self.index.len(),
                self.chain.len()
            )));
        }
        if self.chain.len() > self.max_size_item {
            return Err(InvariantError::new("live entries exceed max_size_item"));
        }
        for (key, &id) in &self.index {
            match self.chain.get(id) {
                Some(entry) if entry.document.key == *key => {},
                _ => return Err(InvariantError::new(format!("index entry {key} is dangling"))),
            }
        }
        let charged: u64 = self.chain.iter().map(|(_, entry)| entry.cost).sum();
        if charged != self.budget.used() {
            return Err(InvariantError::new("memory budget drifted from entry costs"));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("lfu invariant violated: {err}");
        }
    }
}

impl<V> Repository<V> for LfuRepository<V> {
    fn set(&mut self, document: Document<V>) -> Result<()> {
        let cost = match self.budget.weigh(&document) {
            Ok(cost) => cost,
            Err(err) => {
                if self.delete(&document.key) {
                    debug!(key = %document.key, "lfu dropped entry after weigher failure");
                }
                return Err(err);
            },
        };

        if let Some(id) = self.index.get(document.key.as_str()).copied()
            && let Some(entry) = self.chain.get_mut(id)
        {
            let old_cost = std::mem::replace(&mut entry.cost, cost);
            entry.document = document;
            self.chain.requeue(id);
            self.budget.release(old_cost);
            self.budget.charge(cost);
            self.stats.updates += 1;
        } else {
            let key = document.key.clone();
            let id = self.chain.insert(Entry { document, cost });
            self.index.insert(key, id);
            self.budget.charge(cost);
            self.stats.inserts += 1;

            if self.chain.len() > self.max_size_item {
                self.evict_one(EvictionReason::Size);
            }
        }

        while self.budget.is_exceeded() && self.evict_one(EvictionReason::Memory) {}
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<&Document<V>> {
        self.lookup(key, true)
    }

    fn peek(&mut self, key: &str) -> Result<&Document<V>> {
        self.lookup(key, false)
    }

    fn delete(&mut self, key: &str) -> bool {
        match self.index.get(key).copied() {
            Some(id) => self.remove_slot(id).is_some(),
            None => false,
        }
    }

    /// Ascending frequency, join order within a frequency. The order is an
    /// implementation detail.
    fn keys(&self) -> Vec<String> {
        self.chain
            .iter()
            .map(|(_, entry)| entry.document.key.clone())
            .collect()
    }

    fn clear(&mut self) {
        let dropped = self.chain.len();
        self.chain.clear();
        self.index.clear();
        self.budget.reset();
        debug!(dropped, "lfu cleared");
    }

    fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.chain.len()
    }

    fn max_size_item(&self) -> usize {
        self.max_size_item
    }

    fn memory_usage(&self) -> u64 {
        self.budget.used()
    }

    fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<V> fmt::Debug for LfuRepository<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuRepository")
            .field("len", &self.chain.len())
            .field("buckets", &self.chain.bucket_count())
            .field("max_size_item", &self.max_size_item)
            .field("expiry", &self.expiry)
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}
