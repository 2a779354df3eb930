//! Test doubles for storage, time and the session bus
//!
//! Enabled with the `test-utils` feature so downstream crates can use the
//! same doubles in their integration tests.
//!
//! ```rust
//! use stakeadmin_common::testing::FixedClock;
//! use stakeadmin_common::Clock;
//!
//! let clock = FixedClock::at_millis(1_000);
//! clock.advance_millis(500);
//! assert_eq!(clock.millis_since_epoch(), 1_500);
//! ```

#![allow(clippy::missing_errors_doc)]

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use stakeadmin_domain::SessionEvent;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::Receiver;

pub use crate::auth::FixedSalt;
use crate::storage::{KeyValueStore, MemoryStore, StorageError, StorageResult};
use crate::time::Clock;

/// Storage backend where every call fails, as when storage is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl FailingStore {
    fn fault<T>(op: &str) -> StorageResult<T> {
        Err(StorageError::Unavailable(format!("{op} rejected by FailingStore")))
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Self::fault("get")
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Self::fault("set")
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Self::fault("remove")
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Self::fault("keys")
    }
}

/// Backend that serves reads but rejects writes, like a read-only file.
///
/// Counts `get` calls. Clones share entries and the counter.
#[derive(Debug, Clone, Default)]
pub struct ReadOnlyStore {
    entries: MemoryStore,
    reads: Arc<AtomicUsize>,
}

impl ReadOnlyStore {
    /// Store pre-populated with `entries`
    pub fn seeded<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::default();
        for (key, value) in entries {
            let _ = store.entries.set(key, value);
        }
        store
    }

    /// Number of `get` calls so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.entries.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("set rejected by ReadOnlyStore".into()))
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("remove rejected by ReadOnlyStore".into()))
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        self.entries.keys()
    }
}

/// Manually driven wall clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    millis: Arc<AtomicI64>,
}

impl FixedClock {
    pub fn at_millis(millis: i64) -> Self {
        Self { millis: Arc::new(AtomicI64::new(millis)) }
    }

    pub fn set_millis(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance_millis(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn system_time(&self) -> SystemTime {
        let millis = self.millis.load(Ordering::SeqCst).max(0);
        UNIX_EPOCH + Duration::from_millis(millis.unsigned_abs())
    }

    fn millis_since_epoch(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Drain every event already queued on `rx` without waiting.
pub fn collect_events(rx: &mut Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    events
}
