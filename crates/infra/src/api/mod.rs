//! Typed API for the stake-tracking backend
//!
//! Thin wrappers over [`ApiSession`](crate::http::ApiSession): every call
//! goes through the same pipeline, so retries, 401 handling and error
//! normalization apply unchanged.

pub mod endpoints;
pub mod stake_admin;

pub use stake_admin::StakeAdminApi;
