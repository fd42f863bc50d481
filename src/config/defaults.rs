//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::path::PathBuf;
use std::time::Duration;

/// Cluster used when none is configured.
pub const CLUSTER: &str = "default";

/// Namespace used when the namespace list is empty, and by `get_value`.
pub const NAMESPACE: &str = "application";

/// Whether long polling runs by default.
pub const BACKGROUND_SYNC: bool = true;

/// Timeout of a plain configuration fetch in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 3;

/// Timeout of a long-poll request in seconds.
///
/// Longer than the server's hold time so that a held request ends with 304,
/// not a client timeout.
pub const LONG_POLL_TIMEOUT_SECS: u64 = 75;

/// Delay between long-poll iterations in seconds.
pub const POLL_DELAY_SECS: u64 = 2;

/// Interval between heartbeat passes in seconds.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 600;

/// Default configuration file name used by `init`.
pub const CONFIG_FILE: &str = "apollo-sync.toml";

#[must_use]
pub const fn fetch_timeout() -> Duration {
    Duration::from_secs(FETCH_TIMEOUT_SECS)
}

#[must_use]
pub const fn long_poll_timeout() -> Duration {
    Duration::from_secs(LONG_POLL_TIMEOUT_SECS)
}

#[must_use]
pub const fn poll_delay() -> Duration {
    Duration::from_secs(POLL_DELAY_SECS)
}

#[must_use]
pub const fn heartbeat_interval() -> Duration {
    Duration::from_secs(HEARTBEAT_INTERVAL_SECS)
}

/// Default disk cache directory: `~/data/apollo-sync/cache`.
///
/// Falls back to a relative `data/apollo-sync/cache` when the home
/// directory cannot be determined.
#[must_use]
pub fn cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join("data")
        .join("apollo-sync")
        .join("cache")
}
