//! Construction options for [`ApolloClient`](super::ApolloClient).

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::config::defaults;

/// Everything needed to start a client.
///
/// Build with [`ClientOptions::new`] and the `with_*` methods; every field
/// not set explicitly takes the value from [`defaults`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Base URL of the configuration service.
    pub config_url: Url,
    pub app_id: String,
    pub cluster: String,
    /// Access key secret; requests are unsigned when `None`.
    pub secret: Option<String>,
    /// Namespaces kept in sync, in merge order. Never empty.
    pub namespaces: Vec<String>,
    /// Whether the long-poll loop runs.
    pub background_sync: bool,
    /// Client IP reported to the server; discovered when `None`.
    pub ip: Option<String>,
    pub cache_dir: PathBuf,
    pub fetch_timeout: Duration,
    pub long_poll_timeout: Duration,
    pub poll_delay: Duration,
    pub heartbeat_interval: Duration,
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("config_url", &self.config_url.as_str())
            .field("app_id", &self.app_id)
            .field("cluster", &self.cluster)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("namespaces", &self.namespaces)
            .field("background_sync", &self.background_sync)
            .field("ip", &self.ip)
            .field("cache_dir", &self.cache_dir)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("long_poll_timeout", &self.long_poll_timeout)
            .field("poll_delay", &self.poll_delay)
            .field("heartbeat_interval", &self.heartbeat_interval)
            .finish()
    }
}

impl fmt::Display for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "server={}, app={}, cluster={}, namespaces=[{}], signed={}, background_sync={}, cache_dir={}",
            self.config_url,
            self.app_id,
            self.cluster,
            self.namespaces.join(","),
            self.secret.is_some(),
            self.background_sync,
            self.cache_dir.display()
        )
    }
}

impl ClientOptions {
    /// Creates options for `app_id` on the server at `config_url`.
    #[must_use]
    pub fn new(config_url: Url, app_id: impl Into<String>) -> Self {
        Self {
            config_url,
            app_id: app_id.into(),
            cluster: defaults::CLUSTER.to_string(),
            secret: None,
            namespaces: vec![defaults::NAMESPACE.to_string()],
            background_sync: defaults::BACKGROUND_SYNC,
            ip: None,
            cache_dir: defaults::cache_dir(),
            fetch_timeout: defaults::fetch_timeout(),
            long_poll_timeout: defaults::long_poll_timeout(),
            poll_delay: defaults::poll_delay(),
            heartbeat_interval: defaults::heartbeat_interval(),
        }
    }

    #[must_use]
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self
    }

    /// Sets the access key secret. An empty secret disables signing.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.secret = (!secret.is_empty()).then_some(secret);
        self
    }

    /// Sets the namespaces from a comma-separated list.
    ///
    /// See [`parse_namespaces`] for the parsing rules.
    #[must_use]
    pub fn with_namespaces(mut self, list: &str) -> Self {
        self.namespaces = parse_namespaces(list);
        self
    }

    #[must_use]
    pub const fn with_background_sync(mut self, enabled: bool) -> Self {
        self.background_sync = enabled;
        self
    }

    #[must_use]
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    #[must_use]
    pub const fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_long_poll_timeout(mut self, timeout: Duration) -> Self {
        self.long_poll_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    #[must_use]
    pub const fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }
}

/// Parses a comma-separated namespace list.
///
/// Items are trimmed, empty items dropped and duplicates removed keeping the
/// first occurrence. An empty result becomes `["application"]`.
#[must_use]
pub fn parse_namespaces(list: &str) -> Vec<String> {
    let mut namespaces: Vec<String> = Vec::new();
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !namespaces.iter().any(|n| n == name) {
            namespaces.push(name.to_string());
        }
    }
    if namespaces.is_empty() {
        namespaces.push(defaults::NAMESPACE.to_string());
    }
    namespaces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ClientOptions {
        ClientOptions::new(Url::parse("http://config.local:8080").unwrap(), "demo-service")
    }

    #[test]
    fn parse_namespaces_trims_and_dedupes() {
        assert_eq!(
            parse_namespaces(" application , database,,application ,redis"),
            vec!["application", "database", "redis"]
        );
    }

    #[test]
    fn parse_namespaces_defaults_when_empty() {
        assert_eq!(parse_namespaces(""), vec!["application"]);
        assert_eq!(parse_namespaces(" , ,"), vec!["application"]);
    }

    #[test]
    fn new_uses_defaults() {
        let options = options();

        assert_eq!(options.cluster, "default");
        assert_eq!(options.namespaces, vec!["application"]);
        assert!(options.background_sync);
        assert_eq!(options.secret, None);
        assert_eq!(options.fetch_timeout, Duration::from_secs(3));
        assert_eq!(options.long_poll_timeout, Duration::from_secs(75));
        assert_eq!(options.poll_delay, Duration::from_secs(2));
        assert_eq!(options.heartbeat_interval, Duration::from_secs(600));
        assert!(options.cache_dir.ends_with("data/apollo-sync/cache"));
    }

    #[test]
    fn empty_secret_disables_signing() {
        assert_eq!(options().with_secret("").secret, None);
        assert_eq!(options().with_secret("s3cr3t").secret.as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", options().with_secret("s3cr3t"));

        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn display_summarizes_without_secret() {
        let rendered = options()
            .with_namespaces("application,database")
            .with_secret("s3cr3t")
            .to_string();

        assert!(rendered.contains("app=demo-service"));
        assert!(rendered.contains("namespaces=[application,database]"));
        assert!(rendered.contains("signed=true"));
        assert!(!rendered.contains("s3cr3t"));
    }
}
