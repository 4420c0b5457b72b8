//! # Least Recently Used (LRU) repository
//!
//! Ranks entries by recency with a [`RecencyList`] and an index from key to
//! list handle. The tail is the eviction victim.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         LruRepository<V>                             │
//!   │                                                                      │
//!   │   index: FxHashMap<String, SlotId>                                   │
//!   │   ┌──────────┬────────┐                                              │
//!   │   │ "key:3"  │  id_2  │──────────┐                                   │
//!   │   │ "key:1"  │  id_0  │──────────┼──────────────────────┐            │
//!   │   │ "key:2"  │  id_1  │──────┐   │                      │            │
//!   │   └──────────┴────────┘      │   │                      │            │
//!   │                              ▼   ▼                      ▼            │
//!   │   RecencyList<Entry<V>>   head ─► [id_2] ◄──► [id_1] ◄──► [id_0] ◄─ tail
//!   │                           (newest)                    (evict first)  │
//!   │                                                                      │
//!   │   max_size_item · ExpiryPolicy · MemoryBudget · Clock · CacheStats   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Method          | Complexity | Description                                  |
//! |-----------------|------------|----------------------------------------------|
//! | `set(doc)`      | O(1)*      | Insert at head or refresh + move to head     |
//! | `get(&k)`       | O(1)       | Expiry check, then move to head              |
//! | `peek(&k)`      | O(1)       | Expiry check, order unchanged                |
//! | `delete(&k)`    | O(1)       | Unlink and unindex                           |
//! | `oldest()`      | O(1)       | Tail document, order unchanged               |
//! | `pop_oldest()`  | O(1)       | Remove the tail                              |
//! | `keys()`        | O(n)       | Oldest → newest                              |
//!
//! `*` A memory-bounded `set` may evict several tail entries.
//!
//! ## Capacity
//!
//! A new key pushes the list to at most `max_size_item + 1` nodes, so a
//! single tail eviction per `set` restores the bound. A refreshed key never
//! grows the list.
//!
//! ## Example Usage
//!
//! ```
//! use std::time::{Duration, SystemTime};
//!
//! use stashkit::document::Document;
//! use stashkit::policy::LruRepository;
//! use stashkit::repository::Repository;
//!
//! let mut repo = LruRepository::new(2, Duration::from_secs(60)).unwrap();
//! let now = SystemTime::now();
//! repo.set(Document::new("a", 1, now)).unwrap();
//! repo.set(Document::new("b", 2, now)).unwrap();
//! repo.get("a").unwrap();
//! repo.set(Document::new("c", 3, now)).unwrap(); // evicts "b"
//!
//! assert!(!repo.contains("b"));
//! assert_eq!(repo.keys(), vec!["a".to_string(), "c".to_string()]);
//! ```
//!
//! ## Thread Safety
//!
//! Not thread-safe; wrap in [`Cache`](crate::Cache).

use std::fmt;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::clock::{self, SharedClock};
use crate::document::{Document, Entry, ExpiryPolicy};
use crate::ds::recency_list::RecencyList;
use crate::ds::slot_arena::SlotId;
use crate::error::{CacheError, InvariantError, Result};
use crate::policy::{EvictionReason, validate_max_size_item};
use crate::repository::Repository;
use crate::stats::CacheStats;
use crate::weigher::{MemoryBudget, SharedWeigher};

pub struct LruRepository<V> {
    list: RecencyList<Entry<V>>,
    index: FxHashMap<String, SlotId>,
    max_size_item: usize,
    expiry: ExpiryPolicy,
    budget: MemoryBudget<V>,
    clock: SharedClock,
    stats: CacheStats,
}

impl<V> LruRepository<V> {
    /// Creates an unbounded-memory repository.
    ///
    /// `expiry` of zero disables expiry. Fails with
    /// [`CacheError::InvalidConfiguration`] when `max_size_item` is zero.
    pub fn new(max_size_item: usize, expiry: Duration) -> Result<Self> {
        validate_max_size_item(max_size_item)?;
        Ok(Self {
            list: RecencyList::with_capacity(max_size_item.min(1024)),
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
    /// A `max_memory` of zero leaves the repository unbounded and the weigher
    /// is never called.
    pub fn with_memory_limit(mut self, max_memory: u64, weigher: SharedWeigher<V>) -> Self {
        self.budget = MemoryBudget::new(max_memory, weigher);
        self
    }

    /// Replaces the time source used for expiry checks.
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

    /// Least recently used document, without touching the order.
    pub fn oldest(&self) -> Option<&Document<V>> {
        self.list.back().map(|entry| &entry.document)
    }

    /// Removes and returns the least recently used document.
    pub fn pop_oldest(&mut self) -> Option<Document<V>> {
        let id = self.list.back_id()?;
        self.remove_slot(id).map(|entry| entry.document)
    }

    fn remove_slot(&mut self, id: SlotId) -> Option<Entry<V>> {
        let entry = self.list.remove(id)?;
        self.index.remove(entry.document.key.as_str());
        self.budget.release(entry.cost);
        Some(entry)
    }

    fn evict_oldest(&mut self, reason: EvictionReason) -> bool {
        match self.pop_oldest() {
            Some(document) => {
                self.stats.evictions += 1;
                debug!(key = %document.key, %reason, "lru evicted entry");
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
            trace!(key, "lru miss");
            return Err(CacheError::NotFound);
        };

        let now = self.clock.now();
        let expired = self
            .list
            .get(id)
            .is_some_and(|entry| self.expiry.is_expired(&entry.document, now));
        if expired {
            self.remove_slot(id);
            self.stats.expirations += 1;
            trace!(key, "lru purged expired entry");
            return Err(CacheError::NotFound);
        }

        if record_access {
            self.list.move_to_front(id);
            self.stats.hits += 1;
        }
        self.list
            .get(id)
            .map(|entry| &entry.document)
            .ok_or(CacheError::NotFound)
    }

    /// Verifies that the index, the recency list and the budget agree.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        self.list.check_invariants()?;
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index has {} keys but list has {} nodes",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.list.len() > self.max_size_item {
            return Err(InvariantError::new("live entries exceed max_size_item"));
        }
        for (key, &id) in &self.index {
            match self.list.get(id) {
                Some(entry) if entry.document.key == *key => {},
                _ => return Err(InvariantError::new(format!("index entry {key} is dangling"))),
            }
        }
        let charged: u64 = self.list.iter_oldest_first().map(|entry| entry.cost).sum();
        if charged != self.budget.used() {
            return Err(InvariantError::new("memory budget drifted from entry costs"));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("lru invariant violated: {err}");
        }
    }
}

impl<V> Repository<V> for LruRepository<V> {
    fn set(&mut self, document: Document<V>) -> Result<()> {
        let cost = match self.budget.weigh(&document) {
            Ok(cost) => cost,
            Err(err) => {
                if self.delete(&document.key) {
                    debug!(key = %document.key, "lru dropped entry after weigher failure");
                }
                return Err(err);
            },
        };

        if let Some(id) = self.index.get(document.key.as_str()).copied()
            && let Some(entry) = self.list.get_mut(id)
        {
            let old_cost = std::mem::replace(&mut entry.cost, cost);
            entry.document = document;
            self.list.move_to_front(id);
            self.budget.release(old_cost);
            self.budget.charge(cost);
            self.stats.updates += 1;
        } else {
            let key = document.key.clone();
            let id = self.list.push_front(Entry { document, cost });
            self.index.insert(key, id);
            self.budget.charge(cost);
            self.stats.inserts += 1;

            if self.list.len() > self.max_size_item {
                self.evict_oldest(EvictionReason::Size);
            }
        }

        while self.budget.is_exceeded() && self.evict_oldest(EvictionReason::Memory) {}
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

    /// Oldest first.
    fn keys(&self) -> Vec<String> {
        self.list
            .iter_oldest_first()
            .map(|entry| entry.document.key.clone())
            .collect()
    }

    fn clear(&mut self) {
        let dropped = self.list.len();
        self.list.clear();
        self.index.clear();
        self.budget.reset();
        debug!(dropped, "lru cleared");
    }

    fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.list.len()
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

impl<V> fmt::Debug for LruRepository<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruRepository")
            .field("len", &self.list.len())
            .field("max_size_item", &self.max_size_item)
            .field("expiry", &self.expiry)
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::SystemTime;

    use super::*;
    use crate::clock::ManualClock;
    use crate::weigher::SerializedSize;

    const EXPIRY: Duration = Duration::from_secs(5);

    fn repo(max_size_item: usize) -> (LruRepository<String>, ManualClock) {
        let clock = ManualClock::new();
        let repo = LruRepository::new(max_size_item, EXPIRY)
            .unwrap()
            .with_clock(Arc::new(clock.clone()));
        (repo, clock)
    }

    fn doc(clock: &ManualClock, key: &str, value: &str, age: Duration) -> Document<String> {
        use crate::clock::Clock;
        Document::new(key, value.to_string(), clock.now() - age)
    }

    fn fresh(clock: &ManualClock, key: &str, value: &str) -> Document<String> {
        doc(clock, key, value, Duration::from_secs(1))
    }

    // ==============================================
    // Construction
    // ==============================================

    #[test]
    fn zero_capacity_is_rejected() {
        let err = LruRepository::<String>::new(0, EXPIRY).unwrap_err();
        assert!(matches!(err, CacheError::InvalidConfiguration(_)));
    }

    // ==============================================
    // Set / Get
    // ==============================================

    #[test]
    fn set_then_get_returns_document() {
        let (mut repo, clock) = repo(5);
        repo.set(fresh(&clock, "key-2", "Hello World")).unwrap();

        let got = repo.get("key-2").unwrap();
        assert_eq!(got.key, "key-2");
        assert_eq!(got.value, "Hello World");
        repo.debug_validate_invariants();
    }

    #[test]
    fn get_missing_is_not_found() {
        let (mut repo, _clock) = repo(5);
        assert_eq!(repo.get("absent").unwrap_err(), CacheError::NotFound);
        assert_eq!(repo.stats().misses, 1);
    }

    #[test]
    fn reinsert_updates_recency_not_count() {
        let (mut repo, clock) = repo(10);
        repo.set(fresh(&clock, "key-1", "Hello World 1")).unwrap();
        repo.set(fresh(&clock, "key-2", "Hello World 2")).unwrap();
        repo.set(fresh(&clock, "key-1", "Hello World 1 Modified")).unwrap();
        repo.set(fresh(&clock, "key-3", "Hello World 3")).unwrap();
        repo.set(fresh(&clock, "key-1", "Hello World 1 Modified Twice")).unwrap();

        assert_eq!(repo.len(), 3);
        assert_eq!(repo.keys(), vec!["key-2", "key-3", "key-1"]);
        assert_eq!(repo.peek("key-1").unwrap().value, "Hello World 1 Modified Twice");
        assert_eq!(repo.stats().inserts, 3);
        assert_eq!(repo.stats().updates, 2);
        repo.debug_validate_invariants();
    }

    #[test]
    fn reinsert_refreshes_timestamp() {
        let (mut repo, clock) = repo(5);
        repo.set(doc(&clock, "k", "old", Duration::from_secs(4))).unwrap();
        repo.set(fresh(&clock, "k", "new")).unwrap();
        clock.advance(Duration::from_secs(3));
        assert_eq!(repo.get("k").unwrap().value, "new");
    }

    // ==============================================
    // Eviction
    // ==============================================

    #[test]
    fn evicts_least_recently_inserted() {
        let (mut repo, clock) = repo(5);
        for i in 1..=10 {
            repo.set(fresh(&clock, &format!("key:{i}"), "v")).unwrap();
            assert!(repo.len() <= 5);
        }

        for i in 1..=5 {
            assert!(!repo.contains(&format!("key:{i}")), "key:{i} should be evicted");
        }
        for i in 6..=10 {
            assert!(repo.contains(&format!("key:{i}")), "key:{i} should remain");
        }
        assert_eq!(repo.stats().evictions, 5);
        repo.debug_validate_invariants();
    }

    #[test]
    fn get_protects_from_eviction() {
        let (mut repo, clock) = repo(3);
        repo.set(fresh(&clock, "a", "1")).unwrap();
        repo.set(fresh(&clock, "b", "2")).unwrap();
        repo.set(fresh(&clock, "c", "3")).unwrap();

        repo.get("a").unwrap();
        repo.set(fresh(&clock, "d", "4")).unwrap();

        assert!(repo.contains("a"));
        assert!(!repo.contains("b"));
        assert_eq!(repo.oldest().map(|d| d.key.as_str()), Some("c"));
    }

    #[test]
    fn peek_does_not_bump() {
        let (mut repo, clock) = repo(2);
        repo.set(fresh(&clock, "a", "1")).unwrap();
        repo.set(fresh(&clock, "b", "2")).unwrap();
        repo.peek("a").unwrap();
        repo.set(fresh(&clock, "c", "3")).unwrap();
        assert!(!repo.contains("a"));
    }

    #[test]
    fn oldest_and_pop_oldest() {
        let (mut repo, clock) = repo(5);
        assert!(repo.oldest().is_none());
        repo.set(fresh(&clock, "a", "1")).unwrap();
        repo.set(fresh(&clock, "b", "2")).unwrap();

        assert_eq!(repo.oldest().unwrap().key, "a");
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.pop_oldest().unwrap().key, "a");
        assert_eq!(repo.keys(), vec!["b"]);
        repo.debug_validate_invariants();
    }

    // ==============================================
    // Expiry
    // ==============================================

    #[test]
    fn expired_document_is_purged_on_get() {
        let (mut repo, clock) = repo(5);
        repo.set(fresh(&clock, "live", "v")).unwrap();
        repo.set(doc(&clock, "stale", "v", Duration::from_secs(30))).unwrap();
        assert_eq!(repo.len(), 2);

        assert_eq!(repo.get("stale").unwrap_err(), CacheError::NotFound);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.keys(), vec!["live"]);
        assert_eq!(repo.stats().expirations, 1);
        repo.debug_validate_invariants();
    }

    #[test]
    fn contains_ignores_expiry() {
        let (mut repo, clock) = repo(5);
        repo.set(doc(&clock, "stale", "v", Duration::from_secs(30))).unwrap();
        assert!(repo.contains("stale"));
        assert!(repo.peek("stale").is_err());
        assert!(!repo.contains("stale"));
    }

    #[test]
    fn entries_expire_as_clock_advances() {
        let (mut repo, clock) = repo(5);
        repo.set(fresh(&clock, "k", "v")).unwrap();
        clock.advance(Duration::from_secs(3));
        assert!(repo.get("k").is_ok());
        clock.advance(Duration::from_secs(2));
        assert!(repo.get("k").is_err());
    }

    #[test]
    fn zero_expiry_never_expires() {
        let clock = ManualClock::new();
        let mut repo = LruRepository::new(5, Duration::ZERO)
            .unwrap()
            .with_clock(Arc::new(clock.clone()));
        repo.set(doc(&clock, "k", "v", Duration::from_secs(86_400))).unwrap();
        assert!(repo.get("k").is_ok());
    }

    // ==============================================
    // Delete / Clear
    // ==============================================

    #[test]
    fn delete_is_idempotent() {
        let (mut repo, clock) = repo(5);
        repo.set(fresh(&clock, "k", "v")).unwrap();
        assert!(repo.delete("k"));
        assert!(!repo.delete("k"));
        assert!(!repo.delete("never"));
        assert!(repo.is_empty());
        repo.debug_validate_invariants();
    }

    #[test]
    fn clear_empties_everything() {
        let (mut repo, clock) = repo(5);
        for key in ["a", "b", "c"] {
            repo.set(fresh(&clock, key, "v")).unwrap();
        }
        repo.clear();
        assert!(repo.keys().is_empty());
        for key in ["a", "b", "c"] {
            assert!(!repo.contains(key));
        }
        repo.set(fresh(&clock, "d", "v")).unwrap();
        assert_eq!(repo.keys(), vec!["d"]);
        repo.debug_validate_invariants();
    }

    // ==============================================
    // Memory bound
    // ==============================================

    fn bytes_weigher() -> SharedWeigher<String> {
        Arc::new(|doc: &Document<String>| doc.value.len() as u64)
    }

    #[test]
    fn memory_limit_evicts_from_tail() {
        let (repo, clock) = repo(100);
        let mut repo = repo.with_memory_limit(10, bytes_weigher());

        repo.set(fresh(&clock, "a", "1234")).unwrap();
        repo.set(fresh(&clock, "b", "1234")).unwrap();
        assert_eq!(repo.memory_usage(), 8);

        repo.set(fresh(&clock, "c", "12345678")).unwrap();
        assert_eq!(repo.keys(), vec!["c"]);
        assert_eq!(repo.memory_usage(), 8);
        assert_eq!(repo.stats().evictions, 2);
        repo.debug_validate_invariants();
    }

    #[test]
    fn memory_limit_recharges_on_refresh() {
        let (repo, clock) = repo(100);
        let mut repo = repo.with_memory_limit(10, bytes_weigher());
        repo.set(fresh(&clock, "a", "12")).unwrap();
        repo.set(fresh(&clock, "a", "123456")).unwrap();
        assert_eq!(repo.memory_usage(), 6);
        repo.delete("a");
        assert_eq!(repo.memory_usage(), 0);
    }

    #[test]
    fn oversized_document_does_not_survive() {
        let (repo, clock) = repo(100);
        let mut repo = repo.with_memory_limit(4, bytes_weigher());
        repo.set(fresh(&clock, "huge", "0123456789")).unwrap();
        assert!(repo.is_empty());
        assert_eq!(repo.memory_usage(), 0);
    }

    #[test]
    fn zero_memory_limit_disables_weigher() {
        let (repo, clock) = repo(5);
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let weigher: SharedWeigher<String> = Arc::new(move |_: &Document<String>| {
            counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            1
        });
        let mut repo = repo.with_memory_limit(0, weigher);
        repo.set(fresh(&clock, "a", "v")).unwrap();
        assert_eq!(calls.load(std::sync::atomic::Ordering::Relaxed), 0);
        assert_eq!(repo.memory_usage(), 0);
    }

    #[test]
    fn serialized_size_bounds_memory() {
        let clock = ManualClock::starting_at(SystemTime::now());
        let mut repo = LruRepository::<String>::new(100, EXPIRY)
            .unwrap()
            .with_clock(Arc::new(clock.clone()))
            .with_memory_limit(200, Arc::new(SerializedSize));
        for i in 0..50 {
            repo.set(fresh(&clock, &format!("key:{i}"), "Hello World")).unwrap();
            assert!(repo.memory_usage() <= 200);
        }
        assert!(repo.len() < 50);
        assert!(repo.contains("key:49"));
        repo.debug_validate_invariants();
    }

    #[test]
    fn weigher_failure_removes_the_key_and_propagates() {
        let (repo, clock) = repo(5);
        let weigher: SharedWeigher<String> = Arc::new(FailOn("poison"));
        let mut repo = repo.with_memory_limit(1_000, weigher);

        repo.set(fresh(&clock, "k", "fine")).unwrap();
        let err = repo.set(fresh(&clock, "k", "poison")).unwrap_err();
        assert!(matches!(err, CacheError::Serialization(_)));
        assert!(!repo.contains("k"));

        assert!(repo.set(fresh(&clock, "other", "poison")).is_err());
        assert!(repo.is_empty());
        repo.debug_validate_invariants();
    }

    struct FailOn(&'static str);

    impl crate::weigher::Weigher<String> for FailOn {
        fn weigh(&self, document: &Document<String>) -> Result<u64> {
            if document.value == self.0 {
                Err(CacheError::Serialization("cannot size value".into()))
            } else {
                Ok(document.value.len() as u64)
            }
        }
    }
}

#[cfg(test)]
mod property_tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::clock::{Clock, ManualClock};

    #[derive(Debug, Clone)]
    enum Op {
        Set(u8, u8),
        Get(u8),
        Delete(u8),
        Advance(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u8..32, 0u8..8).prop_map(|(k, age)| Op::Set(k, age)),
            3 => (0u8..32).prop_map(Op::Get),
            1 => (0u8..32).prop_map(Op::Delete),
            1 => (0u8..3).prop_map(Op::Advance),
        ]
    }

    proptest! {
        /// Keys match a reference recency model and invariants hold after
        /// every operation.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_matches_recency_model(
            capacity in 1usize..12,
            ops in prop::collection::vec(op_strategy(), 0..200)
        ) {
            let clock = ManualClock::new();
            let mut repo: LruRepository<u8> = LruRepository::new(capacity, Duration::from_secs(5))
                .unwrap()
                .with_clock(Arc::new(clock.clone()));
            // Oldest first, (key, stored_at).
            let mut model: Vec<(String, std::time::SystemTime)> = Vec::new();

            for op in ops {
                match op {
                    Op::Set(k, age) => {
                        let key = format!("k{k}");
                        let at = clock.now() - Duration::from_secs(age as u64);
                        repo.set(Document::new(key.clone(), k, at)).unwrap();
                        model.retain(|(mk, _)| *mk != key);
                        model.push((key, at));
                        if model.len() > capacity {
                            model.remove(0);
                        }
                    },
                    Op::Get(k) => {
                        let key = format!("k{k}");
                        let result = repo.get(&key).map(|d| d.value);
                        match model.iter().position(|(mk, _)| *mk == key) {
                            Some(pos) => {
                                let (mk, at) = model.remove(pos);
                                let age = clock.now().duration_since(at).unwrap_or_default();
                                if age > Duration::from_secs(5) {
                                    prop_assert!(result.is_err());
                                } else {
                                    prop_assert_eq!(result.ok(), Some(k));
                                    model.push((mk, at));
                                }
                            },
                            None => prop_assert!(result.is_err()),
                        }
                    },
                    Op::Delete(k) => {
                        let key = format!("k{k}");
                        let existed = model.iter().any(|(mk, _)| *mk == key);
                        prop_assert_eq!(repo.delete(&key), existed);
                        model.retain(|(mk, _)| *mk != key);
                    },
                    Op::Advance(secs) => clock.advance(Duration::from_secs(secs as u64)),
                }

                prop_assert!(repo.check_invariants().is_ok());
                let expected: Vec<String> = model.iter().map(|(k, _)| k.clone()).collect();
                prop_assert_eq!(repo.keys(), expected);
            }
        }
    }
}
