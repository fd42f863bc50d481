//! Notification-driven refresh loop.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::{Notification, PollOutcome};
use crate::cache::CacheStore;
use crate::change::{diff, dispatch};
use crate::transport::HttpClient;

use super::{Shared, pause, stop_requested};

pub(super) async fn run<H: HttpClient, D: CacheStore>(
    shared: Arc<Shared<H, D>>,
    mut stop: watch::Receiver<bool>,
) {
    tracing::info!("Long polling started");
    while !stop_requested(&stop) {
        shared.long_poll_once().await;
        if !pause(&mut stop, shared.poll_delay).await {
            break;
        }
    }
    tracing::info!("Long polling stopped");
}

impl<H: HttpClient, D: CacheStore> Shared<H, D> {
    /// One long-poll round over every cached namespace.
    pub(super) async fn long_poll_once(&self) {
        let notifications: Vec<Notification> = self
            .memory
            .notification_ids()
            .into_iter()
            .map(|(namespace, id)| Notification::new(namespace, id.unwrap_or(Notification::UNKNOWN_ID)))
            .collect();
        if notifications.is_empty() {
            tracing::debug!("Nothing cached yet, skipping long poll");
            return;
        }

        match self.api.poll_notifications(&notifications).await {
            Ok(PollOutcome::NotModified) => tracing::debug!("No configuration changes"),
            Ok(PollOutcome::Changed(changed)) => {
                // Only the first entry per round; the others still carry
                // stale ids and are reported again next round.
                if let Some(first) = changed.into_iter().next() {
                    self.refresh(&first.namespace_name, first.notification_id)
                        .await;
                }
            }
            Err(e) => tracing::warn!("Long poll failed: {e}"),
        }
    }

    async fn refresh(&self, namespace: &str, notification_id: i64) {
        tracing::info!("{namespace} changed (notification {notification_id}), refreshing");
        let response = match self.api.fetch_config(namespace).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Refreshing {namespace} failed: {e}");
                return;
            }
        };

        let snapshot = response
            .into_snapshot()
            .with_notification_id(notification_id);
        let entries = snapshot.configurations.clone();
        let previous = self.install(namespace, snapshot).await;

        let Some(listener) = &self.listener else {
            return;
        };
        let changes = diff(
            namespace,
            previous.as_ref().map(|s| &s.configurations),
            Some(&entries),
        );
        if !changes.is_empty() {
            tracing::info!("{} change(s) in {namespace}", changes.len());
            dispatch(listener.as_ref(), &changes);
        }
    }
}
