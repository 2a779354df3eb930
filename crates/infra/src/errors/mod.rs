//! Transport-level fault types and conversions.

pub mod conversions;

pub use conversions::TransportFault;
