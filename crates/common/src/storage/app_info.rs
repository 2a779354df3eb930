//! Namespaced app-info entries (profile JSON, feature flags, UI hints).

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::fallback::best_effort;
use super::SharedStore;

/// Prefix-scoped view over a storage backend.
///
/// Every key is stored as `{prefix}{key}` so that deployments sharing one
/// backend do not collide. All operations are best-effort: storage faults
/// are swallowed and reads degrade to `None`.
#[derive(Clone)]
pub struct AppInfoStore {
    store: SharedStore,
    prefix: String,
}

impl std::fmt::Debug for AppInfoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppInfoStore").field("prefix", &self.prefix).finish_non_exhaustive()
    }
}

impl AppInfoStore {
    pub fn new(store: SharedStore, prefix: impl Into<String>) -> Self {
        Self { store, prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Fully-qualified storage key
    pub fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Store `value` under `key`; `None` or an empty string removes the entry.
    pub fn set_app_info(&self, key: &str, value: Option<&str>) {
        let full_key = self.namespaced(key);
        match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                best_effort("set", &full_key, self.store.set(&full_key, value));
            }
            None => {
                best_effort("remove", &full_key, self.store.remove(&full_key));
            }
        }
    }

    pub fn get_app_info(&self, key: &str) -> Option<String> {
        let full_key = self.namespaced(key);
        best_effort("get", &full_key, self.store.get(&full_key)).flatten()
    }

    pub fn clear_app_info(&self, key: &str) {
        self.set_app_info(key, None);
    }

    /// Remove every entry under this store's prefix.
    ///
    /// Entries belonging to other prefixes are left alone.
    pub fn clear_all_app_info(&self) {
        let Some(keys) = best_effort("keys", &self.prefix, self.store.keys()) else {
            return;
        };
        let mut removed = 0usize;
        for key in keys.iter().filter(|k| k.starts_with(&self.prefix)) {
            if best_effort("remove", key, self.store.remove(key)).is_some() {
                removed += 1;
            }
        }
        debug!(prefix = %self.prefix, removed, "cleared app info");
    }

    /// Serialize `value` as JSON and store it
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.set_app_info(key, Some(&json)),
            Err(err) => debug!(key, error = %err, "app info not serializable, skipping"),
        }
    }

    /// Read and deserialize a JSON entry; malformed entries read as `None`
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_app_info(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(key, error = %err, "stored app info is not valid JSON");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde::Deserialize;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use crate::testing::FailingStore;

    fn store_with_prefix(prefix: &str) -> (MemoryStore, AppInfoStore) {
        let backend = MemoryStore::new();
        let app_info = AppInfoStore::new(Arc::new(backend.clone()), prefix);
        (backend, app_info)
    }

    #[test]
    fn test_keys_are_prefixed() {
        let (backend, app_info) = store_with_prefix("staging_");
        app_info.set_app_info("isApp", Some("true"));
        assert_eq!(backend.get("staging_isApp").unwrap(), Some("true".to_string()));
        assert_eq!(app_info.get_app_info("isApp"), Some("true".to_string()));
    }

    #[test]
    fn test_empty_value_removes_entry() {
        let (backend, app_info) = store_with_prefix("p_");
        app_info.set_app_info("hasError", Some("true"));
        app_info.set_app_info("hasError", Some(""));
        assert!(backend.is_empty());
    }

    #[test]
    fn test_clear_all_only_touches_own_prefix() {
        let backend = MemoryStore::new();
        backend.set("other_env_token", "keep").unwrap();
        let app_info = AppInfoStore::new(Arc::new(backend.clone()), "mine_");
        app_info.set_app_info("a", Some("1"));
        app_info.set_app_info("b", Some("2"));

        app_info.clear_all_app_info();

        assert_eq!(backend.keys().unwrap(), vec!["other_env_token".to_string()]);
    }

    #[test]
    fn test_json_helpers() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Flags {
            beta: bool,
        }

        let (_, app_info) = store_with_prefix("p_");
        app_info.set_json("flags", &Flags { beta: true });
        assert_eq!(app_info.get_json::<Flags>("flags"), Some(Flags { beta: true }));

        app_info.set_app_info("flags", Some("{broken"));
        assert_eq!(app_info.get_json::<Flags>("flags"), None);
    }

    #[test]
    fn test_failing_backend_degrades_to_empty() {
        let app_info = AppInfoStore::new(Arc::new(FailingStore), "p_");
        app_info.set_app_info("k", Some("v"));
        assert_eq!(app_info.get_app_info("k"), None);
        app_info.clear_all_app_info();
    }
}
