//! Cache options and defaults.
//!
//! [`CacheOptions`] is a plain serde-friendly struct so it can be embedded in
//! an application's own configuration file. Missing fields fall back to the
//! defaults below.
//!
//! ```
//! use std::time::Duration;
//!
//! use stashkit::config::{CacheOptions, Strategy};
//!
//! let options: CacheOptions = serde_json::from_str(r#"{ "strategy": "lfu", "max_size_item": 500 }"#).unwrap();
//! assert_eq!(options.strategy, Strategy::Lfu);
//! assert_eq!(options.max_size_item, 500);
//! assert_eq!(options.expiry, Duration::from_secs(10));
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

pub const BYTE: u64 = 1;
pub const KB: u64 = 1024 * BYTE;
pub const MB: u64 = 1024 * KB;

/// Default maximum number of live entries.
pub const DEFAULT_SIZE: usize = 100;
/// Default expiry threshold.
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(10);
/// Default memory budget.
pub const DEFAULT_MAX_MEMORY: u64 = 10 * MB;

/// Eviction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Least recently used.
    #[default]
    Lru,
    /// Least frequently used.
    Lfu,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lru => "lru",
            Self::Lfu => "lfu",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("lru") {
            Ok(Self::Lru)
        } else if s.eq_ignore_ascii_case("lfu") {
            Ok(Self::Lfu)
        } else {
            Err(CacheError::invalid_config(format!("unknown strategy {s:?}")))
        }
    }
}

/// Construction parameters for a [`Cache`](crate::Cache).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    pub strategy: Strategy,
    /// Entries older than this are treated as absent. Zero disables expiry.
    pub expiry: Duration,
    /// Maximum number of live entries. Must be at least 1.
    pub max_size_item: usize,
    /// Approximate memory budget in bytes. Zero disables the bound.
    pub max_memory: u64,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            expiry: DEFAULT_EXPIRY,
            max_size_item: DEFAULT_SIZE,
            max_memory: DEFAULT_MAX_MEMORY,
        }
    }
}

impl CacheOptions {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn with_max_size_item(mut self, max_size_item: usize) -> Self {
        self.max_size_item = max_size_item;
        self
    }

    pub fn with_max_memory(mut self, max_memory: u64) -> Self {
        self.max_memory = max_memory;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_size_item == 0 {
            return Err(CacheError::invalid_config("max_size_item must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = CacheOptions::default();
        assert_eq!(options.strategy, Strategy::Lru);
        assert_eq!(options.max_size_item, 100);
        assert_eq!(options.expiry, Duration::from_secs(10));
        assert_eq!(options.max_memory, 10 * 1024 * 1024);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("lru".parse::<Strategy>().unwrap(), Strategy::Lru);
        assert_eq!("LFU".parse::<Strategy>().unwrap(), Strategy::Lfu);
        assert_eq!("Lfu".parse::<Strategy>().unwrap(), Strategy::Lfu);
    }

    #[test]
    fn unknown_strategy_is_invalid_configuration() {
        let err = "arc".parse::<Strategy>().unwrap_err();
        assert!(matches!(err, CacheError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("arc"));
    }

    #[test]
    fn strategy_display_round_trips() {
        for strategy in [Strategy::Lru, Strategy::Lfu] {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn zero_size_fails_validation() {
        let options = CacheOptions::default().with_max_size_item(0);
        assert!(matches!(
            options.validate(),
            Err(CacheError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn setters_chain() {
        let options = CacheOptions::default()
            .with_strategy(Strategy::Lfu)
            .with_expiry(Duration::ZERO)
            .with_max_size_item(3)
            .with_max_memory(0);
        assert_eq!(options.strategy, Strategy::Lfu);
        assert_eq!(options.expiry, Duration::ZERO);
        assert_eq!(options.max_size_item, 3);
        assert_eq!(options.max_memory, 0);
    }

    #[test]
    fn deserialize_fills_missing_fields() {
        let options: CacheOptions = serde_json::from_str(r#"{ "max_memory": 0 }"#).unwrap();
        assert_eq!(options.strategy, Strategy::Lru);
        assert_eq!(options.max_size_item, DEFAULT_SIZE);
        assert_eq!(options.max_memory, 0);
    }

    #[test]
    fn unknown_strategy_fails_to_deserialize() {
        let result: std::result::Result<CacheOptions, _> =
            serde_json::from_str(r#"{ "strategy": "mru" }"#);
        assert!(result.is_err());
    }
}
