//! Application constants
//!
//! Centralized location for header names, storage keys and client defaults.

// Header names
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_REQUEST_ID: &str = "X-Request-Id";
pub const HEADER_SALT: &str = "salt";
pub const HEADER_TIMESTAMP: &str = "X-Timestamp";
pub const HEADER_HASH: &str = "hash";
pub const MIME_JSON: &str = "application/json";

// Storage keys (prefixed with the deployment prefix at runtime)
pub const TOKEN_STORAGE_KEY: &str = "auth_token";
pub const PROFILE_STORAGE_KEY: &str = "profile";

// Origin used when no base URL is configured
pub const DEFAULT_ORIGIN: &str = "https://example.com";

// Client defaults
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_RETRY_BUDGET: u32 = 2;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1_000;
pub const DEFAULT_BACKOFF_CAP_MS: u64 = 4_000;
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

// Signer defaults
pub const DEFAULT_SALT_BYTES: usize = 16;
pub const REQUEST_ID_BYTES: usize = 16;

// Event names, kept for log correlation with the browser console
pub const EVENT_UNAUTHORIZED: &str = "auth:unauthorized";
pub const EVENT_SOFT_REFRESH: &str = "app:soft-refresh";

// Error messages
pub const MSG_NETWORK_ERROR: &str = "Network error - please check your connection";
pub const MSG_TIMEOUT: &str = "Request timed out";
pub const MSG_UNKNOWN_ERROR: &str = "Unknown error occurred";
pub const MSG_UNAUTHORIZED_REASON: &str = "unauthorized";
