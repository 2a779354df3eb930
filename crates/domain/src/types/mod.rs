//! Domain types and models

pub mod envelope;
pub mod events;
pub mod models;
pub mod target;

pub use envelope::{DataEnvelope, ResponseEnvelope};
pub use events::{SessionEvent, UnauthorizedDetail};
pub use models::*;
pub use target::BaseTarget;
