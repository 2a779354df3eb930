//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Main error type for faults outside the HTTP boundary
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum StakeAdminError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for StakeAdmin operations
pub type Result<T> = std::result::Result<T, StakeAdminError>;

/// Machine-readable failure code carried by [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Deadline exceeded before a response arrived
    Timeout,
    /// No response received (DNS, connect, reset)
    Network,
    /// 4xx response
    BadRequest,
    /// 5xx response
    BadResponse,
    /// Response body could not be decoded into the expected type
    Decode,
    /// Request could not be built (bad URL, header, body)
    InvalidRequest,
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "TIMEOUT",
            Self::Network => "NETWORK",
            Self::BadRequest => "BAD_REQUEST",
            Self::BadResponse => "BAD_RESPONSE",
            Self::Decode => "DECODE",
            Self::InvalidRequest => "INVALID_REQUEST",
        }
    }

    /// Code for an HTTP error status
    pub fn for_status(status: u16) -> Self {
        if status >= 500 {
            Self::BadResponse
        } else {
            Self::BadRequest
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories of API errors, used by callers deciding how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401 / 403
    Authentication,
    /// Other 4xx
    Client,
    /// 5xx
    Server,
    /// No response received
    Network,
    /// Deadline exceeded
    Timeout,
    /// Unexpected response body
    Decode,
    /// Request could not be built
    Config,
}

/// The single error shape surfaced by the HTTP pipeline.
///
/// No transport error type leaks past the pipeline; everything is folded
/// into this structure.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ApiError {
    /// Create an error carrying only a message
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), status: None, code: None, details: None, request_id: None }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Whether the server rejected the session (HTTP 401)
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match (self.status, self.code) {
            (Some(401 | 403), _) => ApiErrorCategory::Authentication,
            (Some(status), _) if status >= 500 => ApiErrorCategory::Server,
            (Some(_), _) => ApiErrorCategory::Client,
            (None, Some(ErrorCode::Timeout)) => ApiErrorCategory::Timeout,
            (None, Some(ErrorCode::Decode)) => ApiErrorCategory::Decode,
            (None, Some(ErrorCode::InvalidRequest)) => ApiErrorCategory::Config,
            (None, _) => ApiErrorCategory::Network,
        }
    }
}

impl From<StakeAdminError> for ApiError {
    fn from(err: StakeAdminError) -> Self {
        Self::new(err.to_string()).with_code(ErrorCode::InvalidRequest)
    }
}
