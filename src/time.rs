//! Time abstraction for testability.
//!
//! This module provides a [`Clock`] trait that allows injecting mock clocks
//! in tests while using the real system clock in production. The signer
//! reads its request timestamps through it.

use std::time::SystemTime;

/// Abstraction over system time for testability.
///
/// # Example
///
/// ```
/// use apollo_sync::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// assert!(clock.now() >= std::time::SystemTime::UNIX_EPOCH);
/// assert!(clock.millis_since_epoch() > 0);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;

    /// Returns the current time as milliseconds since the Unix epoch.
    ///
    /// Pre-epoch times (a badly set system clock) read as 0.
    fn millis_since_epoch(&self) -> u128 {
        self.now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis())
    }
}

/// Production clock using actual system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Mock clock for tests.
#[cfg(test)]
pub mod mock {
    use super::Clock;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{Duration, SystemTime};

    /// A clock that returns a controlled time, in milliseconds since epoch.
    #[derive(Debug)]
    pub struct MockClock {
        millis: AtomicU64,
    }

    impl MockClock {
        pub const fn new(initial_millis: u64) -> Self {
            Self {
                millis: AtomicU64::new(initial_millis),
            }
        }

        pub fn advance_millis(&self, millis: u64) {
            self.millis.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> SystemTime {
            SystemTime::UNIX_EPOCH + Duration::from_millis(self.millis.load(Ordering::SeqCst))
        }
    }
}
