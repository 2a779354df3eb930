//! Randomness helpers shared by the request pipeline.

pub mod request_id;

pub use request_id::generate_request_id;
