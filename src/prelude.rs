//! Common imports.
//!
//! ```
//! use stashkit::prelude::*;
//!
//! let cache: Cache<u64> = CacheBuilder::new().max_memory(0).try_build().unwrap();
//! cache.set("answer", 42).unwrap();
//! assert_eq!(cache.get("answer").unwrap(), 42);
//! ```

pub use crate::builder::CacheBuilder;
pub use crate::cache::Cache;
pub use crate::config::{CacheOptions, Strategy};
pub use crate::document::Document;
pub use crate::error::{CacheError, Result};
pub use crate::repository::Repository;
pub use crate::sharded::ShardedCache;
pub use crate::weigher::Weigher;
