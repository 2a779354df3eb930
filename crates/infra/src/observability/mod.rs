//! Logging setup
//!
//! Installs a global `tracing` subscriber. `RUST_LOG` takes precedence over
//! the configured level so operators can raise verbosity without touching
//! configuration files.

use stakeadmin_domain::{LoggingConfig, Result, StakeAdminError};
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` when set and valid, else `config.level`
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| {
        StakeAdminError::Config(format!("Invalid log level '{}': {}", config.level, e))
    })
}

/// Install the global subscriber
///
/// # Errors
/// Returns `StakeAdminError::Config` if the level directive is invalid or a
/// global subscriber has already been installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| StakeAdminError::Config(format!("Failed to install subscriber: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_config_error() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig { level: "stakeadmin=loud".to_string(), json: false };
        assert!(matches!(env_filter(&config), Err(StakeAdminError::Config(_))));
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig { level: "debug".to_string(), json: false };
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
