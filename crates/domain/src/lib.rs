//! # StakeAdmin Domain
//!
//! Domain types shared by the admin console's HTTP core.
//!
//! This crate contains:
//! - Error types (`StakeAdminError`, the normalized `ApiError`)
//! - Client configuration structures
//! - Logical backend targets, response envelopes and session events
//! - Application models consumed through the typed API facade
//! - Constants (header names, defaults)
//!
//! ## Architecture
//! - No dependencies on other StakeAdmin crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
