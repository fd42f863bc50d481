//! File-based snapshot persistence.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use sha2::{Digest, Sha256};

use super::{CacheError, CacheStore, ConfigSnapshot, LoadResult, SaveOutcome};

/// Computes the hex SHA-256 digest of serialized snapshot content.
fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Makes a name safe to embed in a file name.
///
/// Namespace names are normally `[A-Za-z0-9._-]`; anything else is replaced
/// so a name can never escape the cache directory.
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File-based implementation of [`CacheStore`].
///
/// Keeps one JSON file per (app id, namespace) in a directory:
///
/// ```text
/// {dir}/{app_id}_configuration_{namespace}.json
/// ```
///
/// # Redundant Write Suppression
///
/// The store remembers the SHA-256 of the last content it wrote for each
/// file. Saving content with the same hash is a no-op that returns
/// [`SaveOutcome::Unchanged`] without touching the disk.
///
/// # Atomic Writes
///
/// Writes go to `{path}.tmp` and are then renamed over `{path}`, so a
/// crash mid-write never leaves a truncated cache file behind.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
    written: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl FileCacheStore {
    /// Creates a store rooted at `dir`.
    ///
    /// The directory is created on the first save, not here.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the file backing `namespace` of `app_id`.
    #[must_use]
    pub fn path_for(&self, app_id: &str, namespace: &str) -> PathBuf {
        self.dir.join(format!(
            "{}_configuration_{}.json",
            file_safe(app_id),
            file_safe(namespace)
        ))
    }

    fn last_hash(&self, path: &Path) -> Option<String> {
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    fn remember_hash(&self, path: PathBuf, hash: String) {
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, hash);
    }

    fn read_blocking(path: &Path) -> LoadResult {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadResult::NotFound,
            Err(e) => {
                return LoadResult::Corrupted {
                    reason: format!("Failed to read file: {e}"),
                };
            }
        };

        match serde_json::from_str::<ConfigSnapshot>(&content) {
            Ok(snapshot) => LoadResult::Loaded(snapshot),
            Err(e) => LoadResult::Corrupted {
                reason: format!("Invalid JSON: {e}"),
            },
        }
    }

    /// Performs the blocking write.
    ///
    /// Separated out so it can be wrapped in `spawn_blocking`.
    fn write_blocking(path: &Path, content: &str) -> Result<(), CacheError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(CacheError::Write)?;
            }
        }

        // Append .tmp instead of replacing the extension
        let temp_path = PathBuf::from(format!("{}.tmp", path.display()));
        std::fs::write(&temp_path, content).map_err(CacheError::Write)?;
        std::fs::rename(&temp_path, path).map_err(CacheError::Write)?;

        Ok(())
    }
}

impl CacheStore for FileCacheStore {
    async fn load(&self, app_id: &str, namespace: &str) -> LoadResult {
        let path = self.path_for(app_id, namespace);
        tokio::task::spawn_blocking(move || Self::read_blocking(&path))
            .await
            .unwrap_or_else(|e| LoadResult::Corrupted {
                reason: format!("Cache read task failed: {e}"),
            })
    }

    async fn save(
        &self,
        app_id: &str,
        namespace: &str,
        snapshot: &ConfigSnapshot,
    ) -> Result<SaveOutcome, CacheError> {
        let content = serde_json::to_string(snapshot).map_err(CacheError::Serialize)?;
        let hash = content_hash(&content);
        let path = self.path_for(app_id, namespace);

        if self.last_hash(&path).as_deref() == Some(hash.as_str()) {
            tracing::debug!("Cache for {namespace} unchanged, skipping write");
            return Ok(SaveOutcome::Unchanged);
        }

        let target = path.clone();
        tokio::task::spawn_blocking(move || Self::write_blocking(&target, &content))
            .await
            .map_err(CacheError::Task)??;

        self.remember_hash(path, hash);
        Ok(SaveOutcome::Written)
    }
}
