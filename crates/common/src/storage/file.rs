//! JSON-file storage backend

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use super::{KeyValueStore, StorageError, StorageResult};

/// Persists all entries as one JSON object.
///
/// Writes go to a sibling `.tmp` file first and are renamed into place, so a
/// crash mid-write leaves the previous document intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        debug!(path = %path.display(), "opened file storage");
        Ok(Self { path, lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StorageError::Corrupt(format!("{}: {e}", self.path.display()))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        f(&mut entries);
        self.save(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.into_keys().collect())
    }
}
