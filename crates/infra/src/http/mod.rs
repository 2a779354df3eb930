//! Signed HTTP client core
//!
//! - [`client`]: reqwest client bound to one origin
//! - [`router`]: logical target → memoized origin client
//! - [`pipeline`]: request/response stages
//! - [`retry`]: idempotency and backoff policy
//! - [`session`]: [`ApiSession`], which wires the above together

pub mod client;
pub mod pipeline;
pub mod retry;
pub mod router;
pub mod session;

pub use client::{OriginClient, OriginClientBuilder};
pub use pipeline::{Failure, HttpFailure, PreparedRequest, RequestDescriptor};
pub use retry::{is_idempotent, RetryDecision, RetryPolicy};
pub use router::BaseRouter;
pub use session::{ApiSession, ApiSessionBuilder};
