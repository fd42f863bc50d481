//! Local caches behind the remote configuration.
//!
//! This module provides:
//! - The cached unit, [`ConfigSnapshot`]
//! - Disk persistence of last-known-good snapshots ([`CacheStore`], [`FileCacheStore`])
//! - The in-process view shared by resolver and background tasks ([`MemoryCache`])

mod file;
mod memory;
mod snapshot;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::FileCacheStore;
pub use memory::MemoryCache;
pub use snapshot::ConfigSnapshot;

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Result of loading a snapshot from disk.
///
/// Explicitly models all valid states to avoid ambiguity:
/// - Successfully loaded a previous snapshot
/// - Nothing cached yet for this namespace
/// - A cache file exists but is unreadable
#[derive(Debug, Clone)]
pub enum LoadResult {
    /// Successfully loaded a previously saved snapshot.
    Loaded(ConfigSnapshot),

    /// No cache file exists for the namespace.
    NotFound,

    /// Cache file exists but could not be read or parsed.
    /// It will be overwritten by the next successful save.
    Corrupted {
        /// Reason for corruption (for logging/debugging).
        reason: String,
    },
}

impl LoadResult {
    /// Returns the loaded snapshot, or an empty one for `NotFound`/`Corrupted`.
    #[must_use]
    pub fn into_snapshot(self) -> ConfigSnapshot {
        match self {
            Self::Loaded(snapshot) => snapshot,
            Self::NotFound | Self::Corrupted { .. } => ConfigSnapshot::default(),
        }
    }

    /// Returns `true` if a snapshot was successfully loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// What a save actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The file was (re)written.
    Written,
    /// Content matched the last write for this namespace; nothing touched disk.
    Unchanged,
}

/// Errors that can occur while persisting a snapshot.
///
/// Only covers write-side errors; read-side issues are modeled
/// as [`LoadResult`] variants to allow graceful degradation.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to write the cache file.
    #[error("Failed to write cache file: {0}")]
    Write(#[source] io::Error),

    /// Failed to serialize the snapshot to JSON.
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The blocking write task did not complete.
    #[error("Cache write task failed: {0}")]
    Task(#[source] tokio::task::JoinError),
}

/// Abstraction for persisting namespace snapshots between runs.
///
/// Implementations should:
/// - Keep exactly one record per (app id, namespace)
/// - Handle missing records gracefully (return `LoadResult::NotFound`)
/// - Skip writes whose content equals the last write for that record
pub trait CacheStore: Send + Sync {
    /// Loads the snapshot last saved for `namespace` of `app_id`.
    fn load(
        &self,
        app_id: &str,
        namespace: &str,
    ) -> impl std::future::Future<Output = LoadResult> + Send;

    /// Saves `snapshot` as the last-known-good state of `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    fn save(
        &self,
        app_id: &str,
        namespace: &str,
        snapshot: &ConfigSnapshot,
    ) -> impl std::future::Future<Output = Result<SaveOutcome, CacheError>> + Send;
}

impl<T: CacheStore> CacheStore for Arc<T> {
    async fn load(&self, app_id: &str, namespace: &str) -> LoadResult {
        (**self).load(app_id, namespace).await
    }

    async fn save(
        &self,
        app_id: &str,
        namespace: &str,
        snapshot: &ConfigSnapshot,
    ) -> Result<SaveOutcome, CacheError> {
        (**self).save(app_id, namespace, snapshot).await
    }
}
