//! The stored record and the lazy expiry rule.

use std::time::{Duration, SystemTime};

use serde::Serialize;

/// A cached record.
///
/// The value is opaque to the cache; identity is the key. `stored_at` is set
/// when the document is written and refreshed every time the key is set again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document<V> {
    pub key: String,
    pub value: V,
    pub stored_at: SystemTime,
}

impl<V> Document<V> {
    /// Creates a document stamped with `stored_at`.
    pub fn new(key: impl Into<String>, value: V, stored_at: SystemTime) -> Self {
        Self {
            key: key.into(),
            value,
            stored_at,
        }
    }

    /// Age of the document relative to `now`.
    ///
    /// A document stamped in the future has age zero.
    #[inline]
    pub fn age(&self, now: SystemTime) -> Duration {
        now.duration_since(self.stored_at).unwrap_or_default()
    }
}

/// Lazy expiry rule shared by both repositories.
///
/// A zero threshold disables expiry. Otherwise a document is expired once its
/// age is strictly greater than the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpiryPolicy {
    threshold: Duration,
}

impl ExpiryPolicy {
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }

    /// Policy under which nothing ever expires.
    pub fn never() -> Self {
        Self::default()
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        !self.threshold.is_zero()
    }

    #[inline]
    pub fn is_expired<V>(&self, document: &Document<V>, now: SystemTime) -> bool {
        self.is_enabled() && document.age(now) > self.threshold
    }
}

/// A document plus the cost charged for it against the memory budget.
#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) document: Document<V>,
    pub(crate) cost: u64,
}
