//! Periodic re-pull of every namespace, independent of notifications.

use std::sync::Arc;

use tokio::sync::watch;

use crate::cache::CacheStore;
use crate::transport::HttpClient;

use super::{Shared, pause};

/// Repeats the heartbeat pass every interval until stopped.
///
/// The first pass runs during client start, so this waits first.
pub(super) async fn run<H: HttpClient, D: CacheStore>(
    shared: Arc<Shared<H, D>>,
    mut stop: watch::Receiver<bool>,
) {
    tracing::debug!("Heartbeat started");
    while pause(&mut stop, shared.heartbeat_interval).await {
        shared.heartbeat_all().await;
    }
    tracing::debug!("Heartbeat stopped");
}

impl<H: HttpClient, D: CacheStore> Shared<H, D> {
    pub(super) async fn heartbeat_all(&self) {
        for namespace in &self.namespaces {
            self.heartbeat_once(namespace).await;
        }
    }

    /// Re-pulls `namespace`, installing it only if its release key moved.
    ///
    /// Never dispatches change events.
    pub(super) async fn heartbeat_once(&self, namespace: &str) {
        let response = match self.api.fetch_release(namespace).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Heartbeat for {namespace} failed: {e}");
                return;
            }
        };

        if !self
            .memory
            .update_release_key(namespace, &response.release_key)
        {
            tracing::debug!("{namespace} still at release {}", response.release_key);
            return;
        }

        tracing::info!("{namespace} now at release {}", response.release_key);
        self.install(namespace, response.into_snapshot()).await;
    }
}
