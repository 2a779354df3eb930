//! Configuration loader
//!
//! Loads the client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment, if one exists
//! 2. Attempts to load from environment variables
//! 3. If `STAKEADMIN_API_BASE_URL` is unset, falls back to a config file
//! 4. If no file exists either, uses [`ClientConfig::default`]
//!
//! ## Environment Variables
//! - `STAKEADMIN_API_BASE_URL`: Generic API origin (required for env loading)
//! - `STAKEADMIN_AUTH_BASE_URL`: Authorization server origin
//! - `STAKEADMIN_USER_API_BASE_URL`: Versioned user API origin
//! - `STAKEADMIN_STORAGE_PREFIX`: Prefix for persisted keys
//! - `STAKEADMIN_STORAGE_PATH`: JSON file for persistent storage
//! - `STAKEADMIN_LOG_HTTP_ERRORS`: `auto`, `on` or `off`
//! - `STAKEADMIN_TRACE_REQUESTS`: Debug-trace every request (true/false)
//! - `STAKEADMIN_REQUEST_TIMEOUT_MS`: Per-request timeout in milliseconds
//! - `STAKEADMIN_RETRY_BUDGET`: Default retry budget for idempotent requests
//! - `STAKEADMIN_SIGNER_SECRET`: Shared secret for signed requests
//! - `STAKEADMIN_SIGNER_SALT_BYTES`: Salt length in bytes
//! - `STAKEADMIN_SIGNER_SALT_FORMAT`: `base64` or `hex`
//! - `STAKEADMIN_LOG_LEVEL`: Default log filter when `RUST_LOG` is unset
//! - `STAKEADMIN_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./stakeadmin.json` or `./stakeadmin.toml`
//! 2. `./config.json` or `./config.toml`
//! 3. The same names in `..` and `../..`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use stakeadmin_domain::{ClientConfig, LoggingConfig, Result, SignerConfig, StakeAdminError};

const API_BASE_URL: &str = "STAKEADMIN_API_BASE_URL";
const FILE_NAMES: [&str; 4] = ["stakeadmin.json", "stakeadmin.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `StakeAdminError::Config` if a source is present but invalid.
pub fn load() -> Result<ClientConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) if env_opt(API_BASE_URL).is_some() => Err(e),
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path)),
                None => {
                    tracing::info!("No configuration found, using defaults");
                    Ok(ClientConfig::default())
                }
            }
        }
    }
}


/// Load configuration from environment variables
///
/// `STAKEADMIN_API_BASE_URL` must be set; every other variable is optional
/// and overrides the corresponding default.
///
/// # Errors
/// Returns `StakeAdminError::Config` if the API origin is missing or a
/// variable has an invalid value.
pub fn load_from_env() -> Result<ClientConfig> {
    let defaults = ClientConfig::default();

    let api_base_url = env_var(API_BASE_URL)?;

    let mut retry = defaults.retry;
    if let Some(budget) = env_parse::<u32>("STAKEADMIN_RETRY_BUDGET")? {
        retry.budget = budget;
    }

    let signer = match env_opt("STAKEADMIN_SIGNER_SECRET") {
        Some(secret) => {
            let mut signer = SignerConfig::new(secret);
            if let Some(bytes) = env_parse::<usize>("STAKEADMIN_SIGNER_SALT_BYTES")? {
                signer.salt_bytes = bytes;
            }
            if let Some(format) = env_parse("STAKEADMIN_SIGNER_SALT_FORMAT")? {
                signer.salt_format = format;
            }
            Some(signer)
        }
        None => None,
    };

    Ok(ClientConfig {
        auth_base_url: env_opt("STAKEADMIN_AUTH_BASE_URL"),
        api_base_url: Some(api_base_url),
        user_api_base_url: env_opt("STAKEADMIN_USER_API_BASE_URL"),
        storage_prefix: env_opt("STAKEADMIN_STORAGE_PREFIX").unwrap_or(defaults.storage_prefix),
        storage_path: env_opt("STAKEADMIN_STORAGE_PATH"),
        log_http_errors: env_parse("STAKEADMIN_LOG_HTTP_ERRORS")?
            .unwrap_or(defaults.log_http_errors),
        trace_requests: env_bool("STAKEADMIN_TRACE_REQUESTS", defaults.trace_requests),
        request_timeout_ms: env_parse("STAKEADMIN_REQUEST_TIMEOUT_MS")?
            .unwrap_or(defaults.request_timeout_ms),
        retry,
        event_capacity: defaults.event_capacity,
        signer,
        logging: LoggingConfig {
            level: env_opt("STAKEADMIN_LOG_LEVEL").unwrap_or(defaults.logging.level),
            json: env_bool("STAKEADMIN_LOG_JSON", defaults.logging.json),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `StakeAdminError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(StakeAdminError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            StakeAdminError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| StakeAdminError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `StakeAdminError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| StakeAdminError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| StakeAdminError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(StakeAdminError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_from(&cwd)
}

fn probe_from(dir: &Path) -> Option<PathBuf> {
    [dir.to_path_buf(), dir.join(".."), dir.join("../..")]
        .iter()
        .flat_map(|base| FILE_NAMES.iter().map(move |name| base.join(name)))
        .find(|path| path.is_file())
}

/// Get required environment variable
///
/// # Errors
/// Returns `StakeAdminError::Config` if the variable is unset or empty.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        StakeAdminError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Optional variable; empty values count as unset
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse an optional variable with `FromStr`
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| StakeAdminError::Config(format!("Invalid value for {}: {}", key, e)))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
