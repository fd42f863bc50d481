//! In-process cache shared by the resolver and the background tasks.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::ConfigSnapshot;

#[derive(Debug, Default)]
struct State {
    snapshots: HashMap<String, ConfigSnapshot>,
    /// (namespace, key) pairs confirmed absent everywhere.
    missing: HashSet<(String, String)>,
    release_keys: HashMap<String, String>,
}

/// Snapshots, known-missing keys and release keys behind one lock.
///
/// Every operation is a short critical section with no I/O, so a plain
/// mutex is enough even though callers are async.
#[derive(Debug, Default)]
pub struct MemoryCache {
    state: Mutex<State>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached value of `key` in `namespace`.
    #[must_use]
    pub fn value(&self, namespace: &str, key: &str) -> Option<String> {
        self.lock()
            .snapshots
            .get(namespace)
            .and_then(|s| s.get(key))
            .map(ToString::to_string)
    }

    /// Returns a copy of the cached snapshot for `namespace`.
    #[must_use]
    pub fn snapshot(&self, namespace: &str) -> Option<ConfigSnapshot> {
        self.lock().snapshots.get(namespace).cloned()
    }

    /// Replaces the snapshot of `namespace`, returning the previous one.
    ///
    /// A snapshot arriving without a notification id keeps the id of the one
    /// it replaces only when both hold the same entries. Different content
    /// without an id is stored without one, so the next long poll asks from
    /// scratch. `snapshot` is updated in place so the caller persists exactly
    /// what is cached. Keys present in the new snapshot stop being
    /// known-missing.
    pub fn replace(&self, namespace: &str, snapshot: &mut ConfigSnapshot) -> Option<ConfigSnapshot> {
        let mut state = self.lock();

        if snapshot.notification_id.is_none() {
            snapshot.notification_id = state
                .snapshots
                .get(namespace)
                .filter(|previous| previous.configurations == snapshot.configurations)
                .and_then(|previous| previous.notification_id);
        }

        state
            .missing
            .retain(|(ns, key)| ns != namespace || !snapshot.configurations.contains_key(key));

        state
            .snapshots
            .insert(namespace.to_string(), snapshot.clone())
    }

    /// Returns true if `key` was confirmed absent from `namespace`.
    #[must_use]
    pub fn is_missing(&self, namespace: &str, key: &str) -> bool {
        self.lock()
            .missing
            .contains(&(namespace.to_string(), key.to_string()))
    }

    /// Records that `key` is absent from every source for `namespace`.
    pub fn mark_missing(&self, namespace: &str, key: &str) {
        self.lock()
            .missing
            .insert((namespace.to_string(), key.to_string()));
    }

    /// Namespaces currently cached, with their notification ids, sorted by name.
    #[must_use]
    pub fn notification_ids(&self) -> Vec<(String, Option<i64>)> {
        let state = self.lock();
        let mut ids: Vec<_> = state
            .snapshots
            .iter()
            .map(|(ns, s)| (ns.clone(), s.notification_id))
            .collect();
        ids.sort();
        ids
    }

    /// Records `release_key` for `namespace`.
    ///
    /// Returns false, changing nothing, if it equals the last recorded key.
    pub fn update_release_key(&self, namespace: &str, release_key: &str) -> bool {
        let mut state = self.lock();
        if state.release_keys.get(namespace).map(String::as_str) == Some(release_key) {
            return false;
        }
        state
            .release_keys
            .insert(namespace.to_string(), release_key.to_string());
        true
    }

    /// Returns the last recorded release key of `namespace`.
    #[must_use]
    pub fn release_key(&self, namespace: &str) -> Option<String> {
        self.lock().release_keys.get(namespace).cloned()
    }

    /// Merges every cached namespace into one map.
    ///
    /// `order` namespaces are applied first, in order, then any other cached
    /// namespaces sorted by name; later namespaces win on key collisions.
    #[must_use]
    pub fn merged(&self, order: &[String]) -> BTreeMap<String, String> {
        let state = self.lock();
        let mut extra: Vec<&String> = state
            .snapshots
            .keys()
            .filter(|ns| !order.contains(ns))
            .collect();
        extra.sort();

        let mut merged = BTreeMap::new();
        let all = order.iter().chain(extra);
        for snapshot in all.filter_map(|ns| state.snapshots.get(ns)) {
            merged.extend(
                snapshot
                    .configurations
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
        merged
    }
}
