//! Conversions from reqwest errors into transport faults.
//!
//! A [`TransportFault`] is a failure where no HTTP response was obtained. It
//! never leaves the pipeline; the session folds it into an
//! [`ApiError`](stakeadmin_domain::ApiError).

use reqwest::Error as HttpError;
use stakeadmin_domain::constants::{MSG_NETWORK_ERROR, MSG_TIMEOUT, MSG_UNKNOWN_ERROR};
use stakeadmin_domain::ErrorCode;

/// Failure without an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFault {
    /// Deadline exceeded
    Timeout(String),
    /// Connect, DNS, reset or body-read failure
    Network(String),
    /// The request could not be built (bad URL, header or body)
    InvalidRequest(String),
}

impl TransportFault {
    /// Transient faults that an idempotent request may retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Network(_))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Timeout(_) => ErrorCode::Timeout,
            Self::Network(_) => ErrorCode::Network,
            Self::InvalidRequest(_) => ErrorCode::InvalidRequest,
        }
    }

    /// The transport's own description
    pub fn detail(&self) -> &str {
        match self {
            Self::Timeout(msg) | Self::Network(msg) | Self::InvalidRequest(msg) => msg,
        }
    }

    /// Message shown to callers
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout(_) => MSG_TIMEOUT.to_string(),
            Self::Network(_) => MSG_NETWORK_ERROR.to_string(),
            Self::InvalidRequest(msg) if msg.is_empty() => MSG_UNKNOWN_ERROR.to_string(),
            Self::InvalidRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for TransportFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.detail())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportFault */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for TransportFault {
    fn from(err: HttpError) -> Self {
        classify(&err)
    }
}

fn classify(err: &HttpError) -> TransportFault {
    let description = err.to_string();
    if err.is_timeout() {
        TransportFault::Timeout(description)
    } else if err.is_builder() {
        TransportFault::InvalidRequest(description)
    } else {
        TransportFault::Network(description)
    }
}

impl From<url::ParseError> for TransportFault {
    fn from(err: url::ParseError) -> Self {
        TransportFault::InvalidRequest(format!("invalid request URL: {err}"))
    }
}
