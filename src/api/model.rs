//! Wire types of the configuration service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cache::ConfigSnapshot;

/// Body of `GET /configs/{appId}/{cluster}/{namespace}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    /// Application the configuration belongs to.
    #[serde(default)]
    pub app_id: String,

    /// Cluster the configuration was served from.
    #[serde(default)]
    pub cluster: String,

    /// Namespace of the configuration.
    #[serde(default)]
    pub namespace_name: String,

    /// All key/value pairs of the namespace.
    pub configurations: BTreeMap<String, String>,

    /// Identifier of the active release.
    #[serde(default)]
    pub release_key: String,
}

impl ConfigResponse {
    /// Converts the response into a cacheable snapshot (no notification id).
    #[must_use]
    pub fn into_snapshot(self) -> ConfigSnapshot {
        ConfigSnapshot::new(self.configurations)
    }
}

/// One namespace entry of a long-poll request or response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Namespace the entry refers to.
    pub namespace_name: String,
    /// Last notification id known to the client, or the new id from the server.
    pub notification_id: i64,
}

impl Notification {
    /// Id sent for namespaces that have never been notified.
    pub const UNKNOWN_ID: i64 = -1;

    /// Creates a notification entry.
    #[must_use]
    pub fn new(namespace_name: impl Into<String>, notification_id: i64) -> Self {
        Self {
            namespace_name: namespace_name.into(),
            notification_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_server_config_body() {
        let body = r#"{
            "appId": "demo-service",
            "cluster": "default",
            "namespaceName": "application",
            "configurations": {"name": "demo", "timeout": "30"},
            "releaseKey": "20200912-abc"
        }"#;

        let response: ConfigResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.app_id, "demo-service");
        assert_eq!(response.release_key, "20200912-abc");
        assert_eq!(response.configurations.len(), 2);
    }

    #[test]
    fn missing_configurations_is_an_error() {
        let result = serde_json::from_str::<ConfigResponse>(r#"{"releaseKey": "r"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn into_snapshot_has_no_notification_id() {
        let response = ConfigResponse {
            configurations: BTreeMap::from([("k".to_string(), "v".to_string())]),
            ..ConfigResponse::default()
        };

        let snapshot = response.into_snapshot();

        assert_eq!(snapshot.get("k"), Some("v"));
        assert_eq!(snapshot.notification_id, None);
    }

    #[test]
    fn notification_uses_wire_names() {
        let json = serde_json::to_string(&Notification::new("application", -1)).unwrap();
        assert_eq!(json, r#"{"namespaceName":"application","notificationId":-1}"#);
    }

    #[test]
    fn notification_ignores_extra_fields() {
        let body = r#"[{"namespaceName":"application","notificationId":101,"messages":{"details":{}}}]"#;
        let parsed: Vec<Notification> = serde_json::from_str(body).unwrap();

        assert_eq!(parsed, vec![Notification::new("application", 101)]);
    }
}
