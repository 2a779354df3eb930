//! Configuration loading
//!
//! Builds a [`ClientConfig`](stakeadmin_domain::ClientConfig) from the
//! environment, a config file, or defaults.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
