//! Change detection and listener notification.
//!
//! This module provides:
//! - Change events ([`ConfigChange`], [`ChangeKind`])
//! - Key-level diffing of namespace snapshots ([`diff`])
//! - The listener interface and panic-isolated dispatch ([`ChangeListener`], [`dispatch`])

mod event;
mod listener;

#[cfg(test)]
mod event_tests;

pub use event::{ChangeKind, ConfigChange, diff};
pub use listener::{ChangeListener, dispatch};
