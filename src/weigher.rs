//! Approximate memory accounting.
//!
//! A [`Weigher`] assigns an estimated cost to each document. The repositories
//! keep a running total in a [`MemoryBudget`] and evict while the total exceeds
//! the configured limit. Costs are charged once per write and released on
//! removal, so nothing re-sizes the whole index on insert.
//!
//! The estimate is approximate by construction: [`SerializedSize`] measures the
//! JSON encoding of a document, not its in-memory footprint.
//!
//! ## Example
//!
//! ```
//! use std::time::SystemTime;
//!
//! use stashkit::document::Document;
//! use stashkit::weigher::{SerializedSize, Weigher};
//!
//! let doc = Document::new("name", "John Snow".to_string(), SystemTime::UNIX_EPOCH);
//! let cost = SerializedSize.weigh(&doc).unwrap();
//! assert!(cost > "John Snow".len() as u64);
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::document::Document;
use crate::error::Result;

/// Estimates the cost of storing a document.
pub trait Weigher<V>: Send + Sync {
    fn weigh(&self, document: &Document<V>) -> Result<u64>;
}

/// Plain closures returning a byte estimate can be used as weighers.
impl<V, F> Weigher<V> for F
where
    F: Fn(&Document<V>) -> u64 + Send + Sync,
{
    fn weigh(&self, document: &Document<V>) -> Result<u64> {
        Ok(self(document))
    }
}

/// Byte length of the document's `serde_json` encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializedSize;

impl<V> Weigher<V> for SerializedSize
where
    V: Serialize,
{
    fn weigh(&self, document: &Document<V>) -> Result<u64> {
        let bytes = serde_json::to_vec(document)?;
        Ok(bytes.len() as u64)
    }
}

/// Shared weigher handle.
pub type SharedWeigher<V> = Arc<dyn Weigher<V>>;

/// Running total of charged costs against an optional limit.
///
/// The budget is disabled when the limit is zero or no weigher is installed;
/// in that case `weigh` returns zero without calling the weigher.
pub(crate) struct MemoryBudget<V> {
    limit: u64,
    used: u64,
    weigher: Option<SharedWeigher<V>>,
}

impl<V> MemoryBudget<V> {
    pub(crate) fn unbounded() -> Self {
        Self {
            limit: 0,
            used: 0,
            weigher: None,
        }
    }

    pub(crate) fn new(limit: u64, weigher: SharedWeigher<V>) -> Self {
        Self {
            limit,
            used: 0,
            weigher: Some(weigher),
        }
    }

    #[inline]
    pub(crate) fn is_enabled(&self) -> bool {
        self.limit > 0 && self.weigher.is_some()
    }

    pub(crate) fn limit(&self) -> u64 {
        self.limit
    }

    pub(crate) fn used(&self) -> u64 {
        self.used
    }

    pub(crate) fn weigh(&self, document: &Document<V>) -> Result<u64> {
        match &self.weigher {
            Some(weigher) if self.limit > 0 => weigher.weigh(document),
            _ => Ok(0),
        }
    }

    #[inline]
    pub(crate) fn charge(&mut self, cost: u64) {
        self.used = self.used.saturating_add(cost);
    }

    #[inline]
    pub(crate) fn release(&mut self, cost: u64) {
        self.used = self.used.saturating_sub(cost);
    }

    #[inline]
    pub(crate) fn is_exceeded(&self) -> bool {
        self.is_enabled() && self.used > self.limit
    }

    pub(crate) fn reset(&mut self) {
        self.used = 0;
    }
}

impl<V> fmt::Debug for MemoryBudget<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBudget")
            .field("limit", &self.limit)
            .field("used", &self.used)
            .field("weigher", &self.weigher.is_some())
            .finish()
    }
}
