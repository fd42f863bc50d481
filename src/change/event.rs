//! Change event types and the snapshot diff.

use std::collections::BTreeMap;
use std::fmt;

/// The kind of configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A key appeared.
    Add,
    /// A key's value changed.
    Update,
    /// A key disappeared.
    Delete,
}

impl ChangeKind {
    /// Lower-case name used in logs and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single key-level change within a namespace.
///
/// `value` is the new value for [`ChangeKind::Add`] and
/// [`ChangeKind::Update`], and the removed value for [`ChangeKind::Delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigChange {
    /// Whether the key was added, updated or deleted.
    pub kind: ChangeKind,
    /// Namespace the key belongs to.
    pub namespace: String,
    /// The changed key.
    pub key: String,
    /// New value, or the old value for deletions.
    pub value: String,
}

impl ConfigChange {
    /// Creates a new change event.
    #[must_use]
    pub fn new(
        kind: ChangeKind,
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates an "add" event.
    #[must_use]
    pub fn add(namespace: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(ChangeKind::Add, namespace, key, value)
    }

    /// Creates an "update" event.
    #[must_use]
    pub fn update(
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(ChangeKind::Update, namespace, key, value)
    }

    /// Creates a "delete" event.
    #[must_use]
    pub fn delete(
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(ChangeKind::Delete, namespace, key, value)
    }
}

impl fmt::Display for ConfigChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{} = {}",
            self.kind, self.namespace, self.key, self.value
        )
    }
}

/// Compares two versions of a namespace and returns the key-level changes.
///
/// This is a pure function. A missing side is treated as an empty map.
///
/// # Ordering
///
/// 1. Walking the old entries: keys gone from `new` yield `Delete` with the
///    old value, keys with a different value yield `Update` with the new value.
/// 2. Walking the new entries: keys absent from `old` yield `Add`.
///
/// All deletions and updates therefore precede all additions; within each
/// group keys come in sorted order.
#[must_use]
pub fn diff(
    namespace: &str,
    old: Option<&BTreeMap<String, String>>,
    new: Option<&BTreeMap<String, String>>,
) -> Vec<ConfigChange> {
    let empty = BTreeMap::new();
    let old = old.unwrap_or(&empty);
    let new = new.unwrap_or(&empty);

    let mut changes = Vec::new();

    for (key, old_value) in old {
        match new.get(key) {
            None => changes.push(ConfigChange::delete(namespace, key, old_value)),
            Some(new_value) if new_value != old_value => {
                changes.push(ConfigChange::update(namespace, key, new_value));
            }
            Some(_) => {}
        }
    }

    for (key, new_value) in new {
        if !old.contains_key(key) {
            changes.push(ConfigChange::add(namespace, key, new_value));
        }
    }

    changes
}
