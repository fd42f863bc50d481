//! Listener interface for configuration changes.

use std::panic::{AssertUnwindSafe, catch_unwind};

use super::ConfigChange;

/// Receives configuration change events.
///
/// Implemented for any `Fn(&ConfigChange) + Send + Sync` closure, so most
/// callers never name this trait:
///
/// ```
/// use apollo_sync::change::{ChangeListener, ConfigChange};
///
/// fn accepts(_listener: impl ChangeListener) {}
///
/// accepts(|change: &ConfigChange| println!("{change}"));
/// ```
///
/// Listeners are called from the background sync task. A panic inside a
/// listener is caught and logged; it does not stop delivery of the
/// remaining events or affect the caches.
pub trait ChangeListener: Send + Sync {
    /// Called once per changed key.
    fn on_change(&self, change: &ConfigChange);
}

impl<F> ChangeListener for F
where
    F: Fn(&ConfigChange) + Send + Sync,
{
    fn on_change(&self, change: &ConfigChange) {
        self(change);
    }
}

/// Delivers `changes` to `listener` in order, isolating listener panics.
///
/// Returns the number of events the listener handled without panicking.
pub fn dispatch(listener: &dyn ChangeListener, changes: &[ConfigChange]) -> usize {
    let mut delivered = 0;
    for change in changes {
        match catch_unwind(AssertUnwindSafe(|| listener.on_change(change))) {
            Ok(()) => delivered += 1,
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::warn!("Change listener panicked on {change}: {reason}");
            }
        }
    }
    delivered
}
