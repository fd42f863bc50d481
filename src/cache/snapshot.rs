//! The unit of caching: one namespace's full key/value set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Full configuration of one namespace at a point in time.
///
/// Snapshots are replaced whole, never edited key by key. Entries live in a
/// sorted map so the serialized form, and therefore its content hash, is
/// stable for equal contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    /// Key/value pairs of the namespace.
    #[serde(default)]
    pub configurations: BTreeMap<String, String>,

    /// Last notification id the server reported for this namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<i64>,
}

impl ConfigSnapshot {
    /// Creates a snapshot without a notification id.
    #[must_use]
    pub const fn new(configurations: BTreeMap<String, String>) -> Self {
        Self {
            configurations,
            notification_id: None,
        }
    }

    /// Sets the notification id.
    #[must_use]
    pub const fn with_notification_id(mut self, id: i64) -> Self {
        self.notification_id = Some(id);
        self
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.configurations.get(key).map(String::as_str)
    }

    /// Returns true if the snapshot holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_field_names() {
        let snapshot = ConfigSnapshot::from_iter([("timeout", "30")]).with_notification_id(7);
        let json = serde_json::to_string(&snapshot).unwrap();

        assert_eq!(
            json,
            r#"{"configurations":{"timeout":"30"},"notificationId":7}"#
        );
    }

    #[test]
    fn omits_absent_notification_id() {
        let snapshot = ConfigSnapshot::from_iter([("a", "1")]);
        let json = serde_json::to_string(&snapshot).unwrap();

        assert_eq!(json, r#"{"configurations":{"a":"1"}}"#);
    }

    #[test]
    fn serialization_is_order_independent() {
        let a = ConfigSnapshot::from_iter([("b", "2"), ("a", "1")]);
        let b = ConfigSnapshot::from_iter([("a", "1"), ("b", "2")]);

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn deserializes_missing_fields_as_empty() {
        let snapshot: ConfigSnapshot = serde_json::from_str("{}").unwrap();

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.notification_id, None);
    }

    #[test]
    fn get_returns_value() {
        let snapshot = ConfigSnapshot::from_iter([("name", "demo")]);

        assert_eq!(snapshot.get("name"), Some("demo"));
        assert_eq!(snapshot.get("other"), None);
    }
}
