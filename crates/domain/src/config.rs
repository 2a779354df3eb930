//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_BACKOFF_CAP_MS, DEFAULT_EVENT_CAPACITY, DEFAULT_ORIGIN,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_RETRY_BUDGET, DEFAULT_SALT_BYTES,
};
use crate::impl_lowercase_enum_conversions;
use crate::types::BaseTarget;

/// HTTP client configuration for one deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin of the authorization server; falls back to `api_base_url`
    pub auth_base_url: Option<String>,
    /// Origin of the generic API
    pub api_base_url: Option<String>,
    /// Origin of the versioned user API; falls back to the `api` origin
    pub user_api_base_url: Option<String>,
    /// Prefix applied to every persisted key
    pub storage_prefix: String,
    /// JSON file backing persistent storage; in-memory when unset
    pub storage_path: Option<String>,
    pub log_http_errors: LogHttpErrors,
    /// Emit a debug trace for every outbound request
    pub trace_requests: bool,
    pub request_timeout_ms: u64,
    pub retry: RetrySettings,
    /// Buffer size of the session event channel
    pub event_capacity: usize,
    pub signer: Option<SignerConfig>,
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_base_url: None,
            api_base_url: None,
            user_api_base_url: None,
            storage_prefix: String::new(),
            storage_path: None,
            log_http_errors: LogHttpErrors::Auto,
            trace_requests: false,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            retry: RetrySettings::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            signer: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Resolve the origin a logical target maps to.
    ///
    /// Empty strings count as unset.
    pub fn origin_for(&self, target: BaseTarget) -> String {
        let api = non_empty(&self.api_base_url);
        let resolved = match target {
            BaseTarget::Auth => non_empty(&self.auth_base_url).or(api),
            BaseTarget::Api => api,
            BaseTarget::ApiV1 => non_empty(&self.user_api_base_url).or(api),
        };
        resolved.unwrap_or(DEFAULT_ORIGIN).to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Whether failed responses should be logged in this build
    pub fn should_log_http_errors(&self) -> bool {
        self.log_http_errors.enabled(cfg!(debug_assertions))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Switch forcing HTTP error logging on or off independent of build mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogHttpErrors {
    /// Log in debug builds only
    #[default]
    Auto,
    On,
    Off,
}

impl_lowercase_enum_conversions!(LogHttpErrors {
    Auto => "auto",
    On => "on",
    Off => "off",
});

impl LogHttpErrors {
    pub fn enabled(self, debug_build: bool) -> bool {
        match self {
            Self::Auto => debug_build,
            Self::On => true,
            Self::Off => false,
        }
    }
}

/// Retry budget and backoff bounds for idempotent requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Retries after the first attempt, unless overridden per request
    pub budget: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            budget: DEFAULT_RETRY_BUDGET,
            base_delay_ms: DEFAULT_BACKOFF_BASE_MS,
            max_delay_ms: DEFAULT_BACKOFF_CAP_MS,
        }
    }
}

/// Encoding used for the random salt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaltFormat {
    #[default]
    Base64,
    Hex,
}

impl_lowercase_enum_conversions!(SaltFormat {
    Base64 => "base64",
    Hex => "hex",
});

/// Credential signer settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerConfig {
    #[serde(skip_serializing)]
    pub secret: String,
    #[serde(default = "default_salt_bytes")]
    pub salt_bytes: usize,
    #[serde(default)]
    pub salt_format: SaltFormat,
}

fn default_salt_bytes() -> usize {
    DEFAULT_SALT_BYTES
}

impl SignerConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            salt_bytes: DEFAULT_SALT_BYTES,
            salt_format: SaltFormat::Base64,
        }
    }
}

impl std::fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerConfig")
            .field("secret", &"[REDACTED]")
            .field("salt_bytes", &self.salt_bytes)
            .field("salt_format", &self.salt_format)
            .finish()
    }
}

/// Logging output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.retry.budget, 2);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.retry.max_delay_ms, 4000);
        assert_eq!(config.origin_for(BaseTarget::Api), DEFAULT_ORIGIN);
    }

    #[test]
    fn test_auth_falls_back_to_api_origin() {
        let config = ClientConfig {
            api_base_url: Some("https://api.example.org".into()),
            ..Default::default()
        };
        assert_eq!(config.origin_for(BaseTarget::Auth), "https://api.example.org");
        assert_eq!(config.origin_for(BaseTarget::ApiV1), "https://api.example.org");
    }

    #[test]
    fn test_specific_origins_win() {
        let config = ClientConfig {
            auth_base_url: Some("https://auth.example.org".into()),
            api_base_url: Some("https://api.example.org".into()),
            user_api_base_url: Some("https://users.example.org".into()),
            ..Default::default()
        };
        assert_eq!(config.origin_for(BaseTarget::Auth), "https://auth.example.org");
        assert_eq!(config.origin_for(BaseTarget::Api), "https://api.example.org");
        assert_eq!(config.origin_for(BaseTarget::ApiV1), "https://users.example.org");
    }

    #[test]
    fn test_empty_origin_counts_as_unset() {
        let config = ClientConfig {
            auth_base_url: Some(String::new()),
            api_base_url: Some("https://api.example.org".into()),
            ..Default::default()
        };
        assert_eq!(config.origin_for(BaseTarget::Auth), "https://api.example.org");
    }

    #[test]
    fn test_log_http_errors_switch() {
        assert!(LogHttpErrors::Auto.enabled(true));
        assert!(!LogHttpErrors::Auto.enabled(false));
        assert!(LogHttpErrors::On.enabled(false));
        assert!(!LogHttpErrors::Off.enabled(true));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
api_base_url = "https://api.example.org"
log_http_errors = "off"

[retry]
budget = 5
"#,
        )
        .unwrap();
        assert_eq!(config.retry.budget, 5);
        assert_eq!(config.retry.max_delay_ms, 4000);
        assert_eq!(config.log_http_errors, LogHttpErrors::Off);
        assert_eq!(config.request_timeout_ms, 15_000);
    }

    #[test]
    fn test_signer_debug_redacts_secret() {
        let signer = SignerConfig::new("top-secret");
        let debug = format!("{signer:?}");
        assert!(!debug.contains("top-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
