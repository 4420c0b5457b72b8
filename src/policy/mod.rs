pub mod lfu;
pub mod lru;

use std::fmt;

pub use lfu::LfuRepository;
pub use lru::LruRepository;

use crate::error::{CacheError, Result};

/// Why an entry left the cache other than by `delete`/`clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EvictionReason {
    Size,
    Memory,
}

impl fmt::Display for EvictionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size => f.write_str("size"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

pub(crate) fn validate_max_size_item(max_size_item: usize) -> Result<()> {
    if max_size_item == 0 {
        return Err(CacheError::invalid_config("max_size_item must be > 0"));
    }
    Ok(())
}
