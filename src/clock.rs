//! Time source used to stamp documents and evaluate expiry.
//!
//! Repositories never call `SystemTime::now()` directly; they ask a [`Clock`].
//! Production code uses [`SystemClock`]; tests use [`ManualClock`] to move time
//! forward without sleeping.
//!
//! ```
//! use std::time::Duration;
//!
//! use stashkit::clock::{Clock, ManualClock};
//!
//! let clock = ManualClock::new();
//! let start = clock.now();
//! clock.advance(Duration::from_secs(30));
//! assert_eq!(clock.now().duration_since(start).unwrap(), Duration::from_secs(30));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;

/// Wall-clock source.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// Clock backed by [`SystemTime::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Clones share the same underlying instant, so a clone handed to a cache can
/// be advanced from the test body.
#[derive(Clone)]
pub struct ManualClock {
    current: Arc<Mutex<SystemTime>>,
}

impl ManualClock {
    /// Creates a clock frozen at the current wall-clock time.
    pub fn new() -> Self {
        Self::starting_at(SystemTime::now())
    }

    /// Creates a clock frozen at `at`.
    pub fn starting_at(at: SystemTime) -> Self {
        Self {
            current: Arc::new(Mutex::new(at)),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        *current += by;
    }

    /// Sets the clock to `at`.
    pub fn set(&self, at: SystemTime) {
        *self.current.lock() = at;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualClock")
            .field("current", &*self.current.lock())
            .finish()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.current.lock()
    }
}

/// Shared clock handle held by repositories and the facade.
pub type SharedClock = Arc<dyn Clock>;

/// Returns a [`SharedClock`] wrapping [`SystemClock`].
pub fn system() -> SharedClock {
    Arc::new(SystemClock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let before = clock.now();

        handle.advance(Duration::from_secs(5));
        assert_eq!(
            clock.now().duration_since(before).unwrap(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn manual_clock_set_overrides() {
        let clock = ManualClock::new();
        clock.set(SystemTime::UNIX_EPOCH);
        assert_eq!(clock.now(), SystemTime::UNIX_EPOCH);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
