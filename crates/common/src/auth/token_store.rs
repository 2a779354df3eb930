//! Bearer token cache backed by persistent storage.

use parking_lot::RwLock;
use stakeadmin_domain::constants::TOKEN_STORAGE_KEY;
use tracing::debug;

use crate::storage::{AppInfoStore, SharedStore};

/// Cache state. `Unloaded` is the only state that consults storage.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cached {
    Unloaded,
    Loaded(Option<String>),
}

/// Holds the session token in memory and mirrors it to storage.
///
/// Storage is read at most once, on the first access, so a token persisted
/// by an earlier process is picked up. After that the in-memory copy is the
/// source of truth: a set or clear that storage rejects still takes effect
/// for this process. Storage faults never surface; reads degrade to `None`.
#[derive(Debug)]
pub struct TokenStore {
    cached: RwLock<Cached>,
    persisted: AppInfoStore,
}

impl TokenStore {
    pub fn new(store: SharedStore, prefix: impl Into<String>) -> Self {
        Self::from_app_info(AppInfoStore::new(store, prefix))
    }

    pub fn from_app_info(persisted: AppInfoStore) -> Self {
        Self { cached: RwLock::new(Cached::Unloaded), persisted }
    }

    /// Replace the token. `None` or an empty string clears it.
    pub fn set_auth_token(&self, token: Option<&str>) {
        let token = token.filter(|t| !t.is_empty());
        let mut cached = self.cached.write();
        self.persisted.set_app_info(TOKEN_STORAGE_KEY, token);
        *cached = Cached::Loaded(token.map(str::to_owned));
        debug!(present = token.is_some(), "auth token updated");
    }

    /// Current token, hydrating from storage on first access.
    pub fn get_auth_token(&self) -> Option<String> {
        if let Cached::Loaded(token) = &*self.cached.read() {
            return token.clone();
        }

        // Re-check under the write lock so a concurrent set is not overwritten
        let mut cached = self.cached.write();
        if *cached == Cached::Unloaded {
            let stored = self.persisted.get_app_info(TOKEN_STORAGE_KEY).filter(|t| !t.is_empty());
            debug!(present = stored.is_some(), "auth token hydrated from storage");
            *cached = Cached::Loaded(stored);
        }
        match &*cached {
            Cached::Loaded(token) => token.clone(),
            Cached::Unloaded => None,
        }
    }

    pub fn clear_auth_token(&self) {
        self.set_auth_token(None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_auth_token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use crate::testing::{FailingStore, ReadOnlyStore};

    #[test]
    fn test_set_then_get() {
        let store = TokenStore::new(Arc::new(MemoryStore::new()), "");
        store.set_auth_token(Some("abc"));
        assert_eq!(store.get_auth_token().as_deref(), Some("abc"));
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_token_persists_under_prefixed_key() {
        let backend = MemoryStore::new();
        let store = TokenStore::new(Arc::new(backend.clone()), "dev_");
        store.set_auth_token(Some("abc"));
        assert_eq!(backend.get("dev_auth_token").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_fresh_store_hydrates_from_storage() {
        let backend = MemoryStore::new();
        TokenStore::new(Arc::new(backend.clone()), "p_").set_auth_token(Some("persisted"));

        let restarted = TokenStore::new(Arc::new(backend), "p_");
        assert_eq!(restarted.get_auth_token().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_clear_removes_cache_and_storage() {
        let backend = MemoryStore::new();
        let store = TokenStore::new(Arc::new(backend.clone()), "");
        store.set_auth_token(Some("abc"));
        store.clear_auth_token();

        assert_eq!(store.get_auth_token(), None);
        assert!(backend.is_empty());
    }

    #[test]
    fn test_empty_token_is_absent() {
        let store = TokenStore::new(Arc::new(MemoryStore::new()), "");
        store.set_auth_token(Some("abc"));
        store.set_auth_token(Some(""));
        assert_eq!(store.get_auth_token(), None);
    }

    #[test]
    fn test_clear_holds_when_storage_rejects_removal() {
        let backend = ReadOnlyStore::seeded([("auth_token", "stale")]);
        let store = TokenStore::new(Arc::new(backend.clone()), "");
        assert_eq!(store.get_auth_token().as_deref(), Some("stale"));

        store.clear_auth_token();

        assert_eq!(store.get_auth_token(), None);
        assert!(!store.is_authenticated());
        // The persisted copy is still there; only this process forgot it
        assert_eq!(backend.get("auth_token").unwrap().as_deref(), Some("stale"));
    }

    #[test]
    fn test_clear_before_first_read_skips_hydration() {
        let backend = ReadOnlyStore::seeded([("auth_token", "stale")]);
        let store = TokenStore::new(Arc::new(backend.clone()), "");

        store.clear_auth_token();

        assert_eq!(store.get_auth_token(), None);
        assert_eq!(backend.reads(), 0);
    }

    #[test]
    fn test_storage_is_read_once() {
        let backend = ReadOnlyStore::default();
        let store = TokenStore::new(Arc::new(backend.clone()), "");

        for _ in 0..5 {
            assert_eq!(store.get_auth_token(), None);
        }
        assert_eq!(backend.reads(), 1);
    }

    #[test]
    fn test_unavailable_storage_is_not_fatal() {
        let store = TokenStore::new(Arc::new(FailingStore), "");
        assert_eq!(store.get_auth_token(), None);

        // The cache still serves the current process
        store.set_auth_token(Some("abc"));
        assert_eq!(store.get_auth_token().as_deref(), Some("abc"));
    }
}
