//! # Repository contract
//!
//! Both eviction engines implement [`Repository`]. A repository is **not**
//! thread-safe: it owns a ranking structure and a key index that must be
//! mutated together, and [`Cache`](crate::Cache) serializes every call under
//! one lock.
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────┐
//!   │                        Repository<V>                          │
//!   │                                                               │
//!   │  set(&mut, Document<V>)   → Result<()>   insert / refresh     │
//!   │  get(&mut, &str)          → Result<&Document<V>>  ranks hit   │
//!   │  peek(&mut, &str)         → Result<&Document<V>>  no ranking  │
//!   │  delete(&mut, &str)       → bool         idempotent           │
//!   │  keys(&)                  → Vec<String>  snapshot             │
//!   │  contains(&, &str)        → bool         no expiry check      │
//!   │  clear(&mut)                                                  │
//!   └───────────────────────────┬───────────────────────────────────┘
//!                               │
//!              ┌────────────────┴────────────────┐
//!              ▼                                 ▼
//!   ┌────────────────────────┐        ┌────────────────────────┐
//!   │    LruRepository<V>    │        │    LfuRepository<V>    │
//!   │  RecencyList + index   │        │ FrequencyChain + index │
//!   │  evicts the tail       │        │ evicts lowest bucket   │
//!   └────────────────────────┘        └────────────────────────┘
//! ```
//!
//! ## Shared rules
//!
//! - `get` and `peek` evaluate expiry: an entry older than the threshold is
//!   purged and reported as [`CacheError::NotFound`](crate::CacheError::NotFound).
//! - `contains` is a point-in-time membership check and never evaluates expiry.
//! - After `set`, the repository holds at most `max_size_item` entries and, if
//!   a memory budget is configured, their summed cost is within the budget.
//! - `keys` order is an implementation detail of each engine.

use crate::document::Document;
use crate::error::Result;
use crate::stats::CacheStats;

/// Storage and ranking engine behind a cache.
pub trait Repository<V> {
    /// Inserts or refreshes `document`, then enforces the size and memory bounds.
    fn set(&mut self, document: Document<V>) -> Result<()>;

    /// Returns the live document for `key` and records the access.
    fn get(&mut self, key: &str) -> Result<&Document<V>>;

    /// Returns the live document for `key` without recording the access.
    fn peek(&mut self, key: &str) -> Result<&Document<V>>;

    /// Removes `key`; returns whether it was present.
    fn delete(&mut self, key: &str) -> bool;

    /// Snapshot of the live keys. Order is an implementation detail.
    fn keys(&self) -> Vec<String>;

    /// Removes every entry.
    fn clear(&mut self);

    /// Whether `key` is indexed, without side effects or expiry evaluation.
    fn contains(&self, key: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of live entries.
    fn max_size_item(&self) -> usize;

    /// Sum of the weigher costs of the live entries (zero when unbounded).
    fn memory_usage(&self) -> u64;

    fn stats(&self) -> CacheStats;
}
