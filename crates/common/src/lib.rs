//! Building blocks shared by the StakeAdmin HTTP core.
//!
//! Nothing in this crate performs network I/O; the reqwest-backed pieces live
//! in `stakeadmin-infra`.
//!
//! - [`auth`]: credential signer and bearer-token store
//! - [`storage`]: namespaced key–value persistence with a best-effort policy
//! - [`events`]: session event bus (unauthorized, soft refresh)
//! - [`crypto`]: correlation-id generation
//! - [`time`]: wall-clock abstraction

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod crypto;
pub mod events;
pub mod storage;
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use auth::{build_signed_headers, CredentialSigner, SignedHeaderSet, SignerError, TokenStore};
pub use events::SessionEvents;
pub use storage::{
    AppInfoStore, FileStore, KeyValueStore, MemoryStore, SharedStore, StorageError,
    StorageResult,
};
pub use time::{Clock, SystemClock};
