//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::client::ClientOptions;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Options the client is started with
    pub options: ClientOptions,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.options;
        write!(
            f,
            "Config {{ {o}, fetch_timeout: {}s, long_poll_timeout: {}s, poll_delay: {}s, \
             heartbeat_interval: {}s }}",
            o.fetch_timeout.as_secs(),
            o.long_poll_timeout.as_secs(),
            o.poll_delay.as_secs(),
            o.heartbeat_interval.as_secs(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values, which take
    /// precedence over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing (`config_url`, `app_id`)
    /// - The URL is invalid or not http(s)
    /// - The app id, cluster or IP is malformed
    /// - Duration values are zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let config_url = Self::resolve_config_url(cli, toml)?;
        let app_id = Self::resolve_app_id(cli, toml)?;
        let cluster = Self::resolve_cluster(cli, toml)?;
        let ip = Self::resolve_ip(cli, toml)?;

        // CLI flag can only disable; otherwise TOML, then default
        let background_sync = !cli.no_background_sync
            && toml
                .and_then(|t| t.client.background_sync)
                .unwrap_or(defaults::BACKGROUND_SYNC);

        let secret = cli
            .secret
            .clone()
            .or_else(|| toml.and_then(|t| t.server.secret.clone()));

        let sync = toml.map(|t| &t.sync);
        let poll_delay = resolve_duration(
            "poll_delay",
            cli.poll_delay,
            sync.and_then(|s| s.poll_delay),
            defaults::POLL_DELAY_SECS,
        )?;
        let long_poll_timeout = resolve_duration(
            "long_poll_timeout",
            cli.long_poll_timeout,
            sync.and_then(|s| s.long_poll_timeout),
            defaults::LONG_POLL_TIMEOUT_SECS,
        )?;
        let fetch_timeout = resolve_duration(
            "fetch_timeout",
            cli.fetch_timeout,
            sync.and_then(|s| s.fetch_timeout),
            defaults::FETCH_TIMEOUT_SECS,
        )?;
        let heartbeat_interval = resolve_duration(
            "heartbeat_interval",
            cli.heartbeat_interval,
            sync.and_then(|s| s.heartbeat_interval),
            defaults::HEARTBEAT_INTERVAL_SECS,
        )?;

        let mut options = ClientOptions::new(config_url, app_id)
            .with_cluster(cluster)
            .with_namespaces(&Self::resolve_namespaces(cli, toml))
            .with_background_sync(background_sync)
            .with_cache_dir(Self::resolve_cache_dir(cli, toml))
            .with_fetch_timeout(fetch_timeout)
            .with_long_poll_timeout(long_poll_timeout)
            .with_poll_delay(poll_delay)
            .with_heartbeat_interval(heartbeat_interval);
        if let Some(secret) = secret {
            options = options.with_secret(secret);
        }
        if let Some(ip) = ip {
            options = options.with_ip(ip);
        }

        Ok(Self {
            options,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_config_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .config_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.server.config_url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::CONFIG_URL,
                    "Use --config-url, APOLLO_CONFIG_URL or set server.config_url in config file",
                )
            })?;

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(url)
    }

    fn resolve_app_id(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let app_id = cli
            .app_id
            .as_deref()
            .or_else(|| toml.and_then(|t| t.server.app_id.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::APP_ID,
                    "Use --app-id, APOLLO_APP_ID or set server.app_id in config file",
                )
            })?;

        validate_name(field::APP_ID, app_id)
    }

    fn resolve_cluster(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let cluster = cli
            .cluster
            .as_deref()
            .or_else(|| toml.and_then(|t| t.server.cluster.as_deref()))
            .unwrap_or(defaults::CLUSTER);

        validate_name("cluster", cluster)
    }

    fn resolve_ip(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Option<String>, ConfigError> {
        let Some(ip) = cli
            .ip
            .as_deref()
            .or_else(|| toml.and_then(|t| t.client.ip.as_deref()))
        else {
            return Ok(None);
        };

        ip.trim()
            .parse::<IpAddr>()
            .map(|addr| Some(addr.to_string()))
            .map_err(|e| ConfigError::invalid("ip", format!("'{ip}': {e}")))
    }

    /// Returns the namespace list in comma-separated form.
    ///
    /// CLI replaces the TOML list entirely (not merged).
    fn resolve_namespaces(cli: &Cli, toml: Option<&TomlConfig>) -> String {
        if let Some(ref list) = cli.namespaces {
            return list.clone();
        }

        toml.and_then(|t| t.client.namespaces.as_ref())
            .map(|list| list.join(","))
            .unwrap_or_default()
    }

    fn resolve_cache_dir(cli: &Cli, toml: Option<&TomlConfig>) -> PathBuf {
        cli.cache_dir
            .clone()
            .or_else(|| toml.and_then(|t| t.cache.dir.clone()))
            .unwrap_or_else(defaults::cache_dir)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

/// Priority: CLI explicit > TOML > default. Zero is rejected.
fn resolve_duration(
    field: &'static str,
    cli: Option<u64>,
    toml: Option<u64>,
    default: u64,
) -> Result<Duration, ConfigError> {
    let seconds = cli.or(toml).unwrap_or(default);

    if seconds == 0 {
        return Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok(Duration::from_secs(seconds))
}

/// App ids and clusters end up as URL path segments and cache file names.
fn validate_name(field: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::invalid(field, "must not be empty"));
    }
    if value.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(ConfigError::invalid(
            field,
            format!("'{value}' must not contain whitespace or '/'"),
        ));
    }
    Ok(value.to_string())
}

