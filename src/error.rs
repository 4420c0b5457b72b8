//! Error types for the stashkit library.
//!
//! ## Key Components
//!
//! - [`CacheError`]: The error returned by repositories and the cache facade.
//!   [`CacheError::NotFound`] is the only error expected in normal operation.
//! - [`InvariantError`]: Returned by the `check_invariants` methods when the
//!   ranking structures and the key index disagree.
//!
//! ## Example Usage
//!
//! ```
//! use stashkit::error::CacheError;
//! use stashkit::{CacheBuilder, Strategy};
//!
//! let cache = CacheBuilder::<String>::new()
//!     .strategy(Strategy::Lfu)
//!     .max_memory(0)
//!     .try_build()
//!     .unwrap();
//!
//! let err = cache.get("absent").unwrap_err();
//! assert!(err.is_not_found());
//! assert_eq!(err, CacheError::NotFound);
//! ```

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CacheError>;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Errors surfaced by repositories and by [`Cache`](crate::Cache).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The key is absent, or it was present but expired and has been purged.
    ///
    /// A miss and an expired hit are deliberately indistinguishable.
    #[error("item missing from cache")]
    NotFound,

    /// Construction-time misconfiguration (zero capacity, unknown strategy).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The memory-cost function failed to size a document.
    #[error("serialization failure: {0}")]
    Serialization(String),
}

impl CacheError {
    /// Creates an [`CacheError::InvalidConfiguration`] with the given description.
    #[inline]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Returns `true` for [`CacheError::NotFound`].
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal ranking invariants are violated.
///
/// Produced by `check_invariants` on the repositories. Carries a
/// human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
