//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Configuration service section
    #[serde(default)]
    pub server: ServerSection,

    /// Client behavior section
    #[serde(default)]
    pub client: ClientSection,

    /// Timing section
    #[serde(default)]
    pub sync: SyncSection,

    /// Disk cache section
    #[serde(default)]
    pub cache: CacheSection,
}

/// Configuration service section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Base URL of the configuration service
    pub config_url: Option<String>,

    /// Application id
    pub app_id: Option<String>,

    /// Cluster name
    pub cluster: Option<String>,

    /// Access key secret
    pub secret: Option<String>,
}

/// Client behavior section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Namespaces to keep in sync
    pub namespaces: Option<Vec<String>>,

    /// Whether long polling runs
    pub background_sync: Option<bool>,

    /// Client IP reported to the server
    pub ip: Option<String>,
}

/// Timing section. All values are in seconds.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncSection {
    pub poll_delay: Option<u64>,
    pub long_poll_timeout: Option<u64>,
    pub fetch_timeout: Option<u64>,
    pub heartbeat_interval: Option<u64>,
}

/// Disk cache section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSection {
    /// Directory of the disk cache
    pub dir: Option<PathBuf>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# apollo-sync Configuration File

[server]
# Base URL of the configuration service (required)
# Can also be set with APOLLO_CONFIG_URL.
# config_url = "http://localhost:8080"

# Application id (required)
# Can also be set with APOLLO_APP_ID.
# app_id = "demo-service"

# Cluster name (default: "default")
# cluster = "default"

# Access key secret; requests are signed when set.
# Prefer APOLLO_SECRET over storing the secret here.
# secret = ""

[client]
# Namespaces to keep in sync, in merge order (default: ["application"])
# Later namespaces override earlier ones in `dump`.
# namespaces = ["application"]

# Long polling for changes (default: true)
# The heartbeat runs either way.
# background_sync = true

# Client IP reported to the server (default: discovered)
# ip = "10.0.0.1"

[sync]
# Delay between long polls in seconds (default: 2)
# poll_delay = 2

# Long-poll request timeout in seconds (default: 75)
# Must exceed the server's hold time.
# long_poll_timeout = 75

# Configuration fetch timeout in seconds (default: 3)
# fetch_timeout = 3

# Interval between heartbeat passes in seconds (default: 600)
# heartbeat_interval = 600

[cache]
# Directory of the disk cache (default: ~/data/apollo-sync/cache)
# dir = "/var/cache/apollo-sync"
"#
    .to_string()
}
