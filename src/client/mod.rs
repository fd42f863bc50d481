//! The configuration client: tiered value resolution plus background sync.
//!
//! Values are resolved from the first tier that has them:
//!
//! 1. the in-memory snapshot of the namespace
//! 2. the negative cache (returns the caller's default without I/O)
//! 3. a fetch from the configuration service
//! 4. the disk cache
//! 5. the caller's default
//!
//! Two background tasks keep memory and disk fresh: a long-poll loop that
//! reacts to server notifications and dispatches change events, and a slow
//! heartbeat that re-pulls every namespace when its release key moves.
//! Both end when the client is stopped, shut down or dropped.

mod heartbeat;
mod long_poll;
mod options;


use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::api::{ConfigApi, local_ip};
use crate::cache::{
    CacheStore, ConfigSnapshot, FileCacheStore, LoadResult, MemoryCache, SaveOutcome,
};
use crate::change::ChangeListener;
use crate::config::defaults;
use crate::sign::Signer;
use crate::transport::{HttpClient, ReqwestClient};

pub use options::{ClientOptions, parse_namespaces};

/// State shared between the caller-facing client and its background tasks.
struct Shared<H, D> {
    api: ConfigApi<H>,
    store: D,
    memory: MemoryCache,
    namespaces: Vec<String>,
    listener: Option<Arc<dyn ChangeListener>>,
    poll_delay: Duration,
    heartbeat_interval: Duration,
    /// Serializes snapshot installs so memory and disk see writes in the same order.
    writer: Mutex<()>,
}

impl<H: HttpClient, D: CacheStore> Shared<H, D> {
    async fn lookup(&self, namespace: &str, key: &str) -> Option<String> {
        if let Some(value) = self.memory.value(namespace, key) {
            return Some(value);
        }
        if self.memory.is_missing(namespace, key) {
            tracing::debug!("{namespace}/{key} is known to be missing");
            return None;
        }

        match self.api.fetch_config(namespace).await {
            Ok(response) => {
                let snapshot = response.into_snapshot();
                if let Some(value) = snapshot.get(key).map(ToString::to_string) {
                    self.install(namespace, snapshot).await;
                    return Some(value);
                }
                tracing::debug!("{namespace}/{key} not on the server, trying disk cache");
            }
            Err(e) => tracing::warn!("Fetching {namespace} failed, trying disk cache: {e}"),
        }

        let snapshot = match self.store.load(self.api.app_id(), namespace).await {
            LoadResult::Loaded(snapshot) => snapshot,
            LoadResult::NotFound => ConfigSnapshot::default(),
            LoadResult::Corrupted { reason } => {
                tracing::warn!("Ignoring corrupted disk cache for {namespace}: {reason}");
                ConfigSnapshot::default()
            }
        };
        if let Some(value) = snapshot.get(key).map(ToString::to_string) {
            tracing::info!("Serving {namespace}/{key} from disk cache");
            self.install(namespace, snapshot).await;
            return Some(value);
        }

        tracing::debug!("{namespace}/{key} not found anywhere");
        self.memory.mark_missing(namespace, key);
        None
    }

    /// Replaces the cached snapshot of `namespace` and persists it.
    ///
    /// Returns the snapshot it replaced. Disk failures are logged; the memory
    /// cache is updated regardless.
    async fn install(&self, namespace: &str, mut snapshot: ConfigSnapshot) -> Option<ConfigSnapshot> {
        let _writer = self.writer.lock().await;
        let previous = self.memory.replace(namespace, &mut snapshot);

        match self.store.save(self.api.app_id(), namespace, &snapshot).await {
            Ok(SaveOutcome::Written) => tracing::debug!("Persisted {namespace} to disk cache"),
            Ok(SaveOutcome::Unchanged) => {}
            Err(e) => tracing::warn!("Failed to persist {namespace} to disk cache: {e}"),
        }
        previous
    }
}

/// Returns true once the stop signal was sent or its sender dropped.
fn stop_requested(stop: &watch::Receiver<bool>) -> bool {
    stop.has_changed().is_err() || *stop.borrow()
}

/// Waits for `delay`, returning false early if a stop is requested.
async fn pause(stop: &mut watch::Receiver<bool>, delay: Duration) -> bool {
    if stop_requested(stop) {
        return false;
    }
    tokio::select! {
        biased;

        changed = stop.changed() => changed.is_ok() && !*stop.borrow(),
        () = tokio::time::sleep(delay) => true,
    }
}

/// A running configuration client.
///
/// Created with [`ApolloClient::builder`]. Lookups never fail: every error is
/// logged and the next tier (ultimately the caller's default) is used.
///
/// ```no_run
/// use apollo_sync::{ApolloClient, ClientOptions};
/// use url::Url;
///
/// # async fn demo() -> Result<(), url::ParseError> {
/// let options = ClientOptions::new(Url::parse("http://localhost:8080")?, "demo-service")
///     .with_namespaces("application,database");
/// let client = ApolloClient::builder(options)
///     .with_listener(|change: &apollo_sync::ConfigChange| println!("{change}"))
///     .start()
///     .await;
///
/// let timeout = client.get_value("timeout", "30").await;
/// # let _ = timeout;
/// client.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct ApolloClient<H = ReqwestClient, D = FileCacheStore> {
    shared: Arc<Shared<H, D>>,
    stop: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl<H, D> std::fmt::Debug for ApolloClient<H, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApolloClient")
            .field("app_id", &self.shared.api.app_id())
            .field("namespaces", &self.shared.namespaces)
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl ApolloClient {
    /// Starts building a client with the production HTTP client and disk store.
    #[must_use]
    pub fn builder(options: ClientOptions) -> ClientBuilder {
        ClientBuilder::new(options)
    }
}

impl<H: HttpClient + 'static, D: CacheStore + 'static> ApolloClient<H, D> {
    /// Resolves `key` in the `application` namespace.
    pub async fn get_value(&self, key: &str, default: &str) -> String {
        self.get_value_in(defaults::NAMESPACE, key, default).await
    }

    /// Resolves `key` in `namespace`, returning `default` when no tier has it.
    ///
    /// The default is never cached; two callers asking for the same missing
    /// key with different defaults each get their own.
    pub async fn get_value_in(&self, namespace: &str, key: &str, default: &str) -> String {
        self.lookup(namespace, key)
            .await
            .unwrap_or_else(|| default.to_string())
    }

    /// Resolves `key` in `namespace` without a default.
    pub async fn lookup(&self, namespace: &str, key: &str) -> Option<String> {
        self.shared.lookup(namespace, key).await
    }
}

impl<H, D> ApolloClient<H, D> {
    /// Merges every cached namespace into one map.
    ///
    /// Configured namespaces are applied in order, followed by namespaces
    /// cached on demand; later namespaces override earlier ones.
    #[must_use]
    pub fn get_config(&self) -> BTreeMap<String, String> {
        self.shared.memory.merged(&self.shared.namespaces)
    }

    /// The configured namespaces.
    #[must_use]
    pub fn namespaces(&self) -> &[String] {
        &self.shared.namespaces
    }

    /// Returns a copy of the cached snapshot of `namespace`.
    #[must_use]
    pub fn snapshot(&self, namespace: &str) -> Option<ConfigSnapshot> {
        self.shared.memory.snapshot(namespace)
    }

    /// Returns true while any background task is still running.
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.tasks.iter().any(|task| !task.is_finished())
    }

    /// Signals the background tasks to stop.
    ///
    /// Loops notice the signal at their next iteration boundary or while
    /// waiting out a delay; an in-flight long poll is not interrupted.
    pub fn stop(&self) {
        if !self.stop.send_replace(true) {
            tracing::info!("Stopping background sync");
        }
    }

    /// Stops the background tasks and waits for them to finish.
    pub async fn shutdown(mut self) {
        self.stop();
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                tracing::warn!("Background task ended abnormally: {e}");
            }
        }
    }
}

/// Builder for [`ApolloClient`].
///
/// The HTTP client and cache store can be swapped, which changes the
/// builder's type parameters.
pub struct ClientBuilder<H = ReqwestClient, D = FileCacheStore> {
    options: ClientOptions,
    http: H,
    store: D,
    listener: Option<Arc<dyn ChangeListener>>,
}

impl ClientBuilder {
    #[must_use]
    pub fn new(options: ClientOptions) -> Self {
        let store = FileCacheStore::new(&options.cache_dir);
        Self {
            options,
            http: ReqwestClient::new(),
            store,
            listener: None,
        }
    }
}

impl<H, D> ClientBuilder<H, D> {
    /// Uses a different HTTP client.
    #[must_use]
    pub fn with_http_client<H2>(self, http: H2) -> ClientBuilder<H2, D> {
        ClientBuilder {
            options: self.options,
            http,
            store: self.store,
            listener: self.listener,
        }
    }

    /// Uses a different disk cache store.
    #[must_use]
    pub fn with_cache_store<D2>(self, store: D2) -> ClientBuilder<H, D2> {
        ClientBuilder {
            options: self.options,
            http: self.http,
            store,
            listener: self.listener,
        }
    }

    /// Sets the listener receiving change events from the long-poll loop.
    #[must_use]
    pub fn with_listener(mut self, listener: impl ChangeListener + 'static) -> Self {
        self.listener = Some(Arc::new(listener));
        self
    }
}

impl<H: HttpClient + 'static, D: CacheStore + 'static> ClientBuilder<H, D> {
    /// Runs the warm heartbeat pass and spawns the background tasks.
    ///
    /// Must be called inside a tokio runtime. Never fails: an unreachable
    /// server only means the caches start empty.
    pub async fn start(self) -> ApolloClient<H, D> {
        let Self {
            options,
            http,
            store,
            listener,
        } = self;

        let ip = options
            .ip
            .clone()
            .unwrap_or_else(|| local_ip().to_string());
        let signer = Signer::new(options.app_id.clone(), options.secret.clone());
        let api = ConfigApi::new(
            http,
            options.config_url.clone(),
            options.app_id.clone(),
            options.cluster.clone(),
            ip,
        )
        .with_signer(signer)
        .with_timeouts(options.fetch_timeout, options.long_poll_timeout);

        tracing::info!("Starting configuration client: {options}");

        let shared = Arc::new(Shared {
            api,
            store,
            memory: MemoryCache::new(),
            namespaces: options.namespaces,
            listener,
            poll_delay: options.poll_delay,
            heartbeat_interval: options.heartbeat_interval,
            writer: Mutex::new(()),
        });

        shared.heartbeat_all().await;

        let (stop, _) = watch::channel(false);
        let mut tasks = Vec::with_capacity(2);
        if options.background_sync {
            tasks.push(tokio::spawn(long_poll::run(
                Arc::clone(&shared),
                stop.subscribe(),
            )));
        }
        tasks.push(tokio::spawn(heartbeat::run(
            Arc::clone(&shared),
            stop.subscribe(),
        )));

        ApolloClient {
            shared,
            stop,
            tasks,
        }
    }
}
