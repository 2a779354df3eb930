//! # StakeAdmin Infrastructure
//!
//! The signed HTTP core of the admin console.
//!
//! This crate contains:
//! - Per-origin HTTP clients and the base router
//! - The request/response pipeline (request ids, bearer injection, retry
//!   with backoff, 401 handling, error normalization)
//! - The typed API facade over the admin backend
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Builds on `stakeadmin-common` (signer, token store, storage, events)
//! - Contains all network I/O

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::StakeAdminApi;
pub use errors::TransportFault;
pub use http::*;
pub use observability::init_tracing;
