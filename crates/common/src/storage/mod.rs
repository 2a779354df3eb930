//! Namespaced key–value persistence
//!
//! The browser build kept the bearer token and small app-info blobs in
//! `localStorage`. Here the same role is played by a [`KeyValueStore`]:
//!
//! - [`MemoryStore`]: process-local map, the default
//! - [`FileStore`]: a JSON document on disk that survives restarts
//! - [`AppInfoStore`]: prefixes every key with the deployment prefix and
//!   applies the [`fallback::best_effort`] policy
//!
//! Backends report faults through [`StorageError`]; the namespaced layer
//! swallows them so a broken backend behaves like an empty one.

pub mod app_info;
pub mod error;
pub mod fallback;
pub mod file;
pub mod memory;

use std::sync::Arc;

pub use app_info::AppInfoStore;
pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// String key–value storage backend
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or replace a value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a value; removing an absent key is not an error
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// All keys currently stored
    fn keys(&self) -> StorageResult<Vec<String>>;
}

/// Shared handle to a storage backend
pub type SharedStore = Arc<dyn KeyValueStore>;
