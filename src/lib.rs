//! stashkit: an in-process key/value cache with LRU and LFU eviction, lazy
//! expiry and an approximate memory bound.
//!
//! The eviction engines ([`policy::LruRepository`], [`policy::LfuRepository`])
//! are single-threaded and keep their ranking in index-linked arenas
//! ([`ds`]). [`Cache`] puts one engine behind a lock; [`ShardedCache`] stripes
//! keys over several `Cache`s.
//!
//! ```
//! use std::time::Duration;
//!
//! use stashkit::{CacheBuilder, Strategy};
//!
//! let cache = CacheBuilder::<String>::new()
//!     .strategy(Strategy::Lfu)
//!     .max_size_item(2)
//!     .expiry(Duration::from_secs(60))
//!     .max_memory(0)
//!     .try_build()
//!     .unwrap();
//!
//! cache.set("a", "1".to_string()).unwrap();
//! cache.set("b", "2".to_string()).unwrap();
//! cache.get("a").unwrap();
//! cache.set("c", "3".to_string()).unwrap();
//!
//! assert!(cache.contains("a"));
//! assert!(!cache.contains("b"));
//! ```

pub mod builder;
pub mod cache;
pub mod clock;
pub mod config;
pub mod document;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod repository;
pub mod sharded;
pub mod stats;
pub mod weigher;

pub use crate::builder::CacheBuilder;
pub use crate::cache::Cache;
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{CacheOptions, Strategy};
pub use crate::document::{Document, ExpiryPolicy};
pub use crate::error::{CacheError, Result};
pub use crate::policy::{LfuRepository, LruRepository};
pub use crate::repository::Repository;
pub use crate::sharded::ShardedCache;
pub use crate::stats::CacheStats;
pub use crate::weigher::{SerializedSize, Weigher};
