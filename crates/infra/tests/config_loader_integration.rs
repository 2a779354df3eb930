//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! feeding it into a session.

use std::io::Write;

use stakeadmin_domain::{BaseTarget, LogHttpErrors, StakeAdminError};
use stakeadmin_infra::{config, ApiSession};
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "auth_base_url": "https://auth.example.org",
            "api_base_url": "https://api.example.org",
            "user_api_base_url": "https://users.example.org",
            "storage_prefix": "staging_",
            "log_http_errors": "on",
            "request_timeout_ms": 3000,
            "retry": { "budget": 3, "base_delay_ms": 250, "max_delay_ms": 1000 },
            "signer": { "secret": "integration-secret", "salt_bytes": 24 },
            "logging": { "level": "debug", "json": true }
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("Failed to load JSON config");

    assert_eq!(config.origin_for(BaseTarget::Auth), "https://auth.example.org");
    assert_eq!(config.origin_for(BaseTarget::Api), "https://api.example.org");
    assert_eq!(config.origin_for(BaseTarget::ApiV1), "https://users.example.org");
    assert_eq!(config.storage_prefix, "staging_");
    assert_eq!(config.log_http_errors, LogHttpErrors::On);
    assert!(config.should_log_http_errors());
    assert_eq!(config.request_timeout_ms, 3000);
    assert_eq!(config.retry.budget, 3);
    assert_eq!(config.retry.max_delay_ms, 1000);
    assert_eq!(config.signer.as_ref().map(|s| s.salt_bytes), Some(24));
    assert!(config.logging.json);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let path = write_config(
        r#"
api_base_url = "https://api.example.org"
log_http_errors = "off"
trace_requests = true

[retry]
budget = 0
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("Failed to load TOML config");

    assert_eq!(config.origin_for(BaseTarget::Auth), "https://api.example.org");
    assert!(!config.should_log_http_errors());
    assert!(config.trace_requests);
    assert_eq!(config.retry.budget, 0);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert!(config.signer.is_none());

    std::fs::remove_file(path).ok();
}

#[test]
fn test_loaded_config_builds_session() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let storage = dir.path().join("storage.json");
    let path = write_config(
        &format!(
            r#"{{
                "api_base_url": "http://127.0.0.1:9",
                "storage_prefix": "it_",
                "storage_path": "{}",
                "signer": {{ "secret": "integration-secret" }}
            }}"#,
            storage.display()
        ),
        "json",
    );

    let config = config::load_from_file(Some(path.clone()))?;
    let session = ApiSession::new(config)?;
    session.login("persisted-token");

    let raw = std::fs::read_to_string(&storage)?;
    assert!(raw.contains("it_auth_token"));
    assert!(session.sign("u-1", "ada", "ADMIN").is_ok());

    std::fs::remove_file(path).ok();
    Ok(())
}

#[test]
fn test_invalid_switch_in_file_is_rejected() {
    let path = write_config(r#"{ "log_http_errors": "sometimes" }"#, "json");

    let err = config::load_from_file(Some(path.clone())).unwrap_err();
    assert!(matches!(err, StakeAdminError::Config(_)));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_file_is_config_error() {
    let err = config::load_from_file(Some("/definitely/not/here.toml".into())).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}
