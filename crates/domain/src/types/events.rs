//! Session events broadcast to UI shells

use serde::{Deserialize, Serialize};

use crate::constants::{EVENT_SOFT_REFRESH, EVENT_UNAUTHORIZED};

/// Payload of the unauthorized notification raised on any 401 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnauthorizedDetail {
    /// Milliseconds since the Unix epoch
    pub at: i64,
    pub status: u16,
    pub request_id: Option<String>,
    /// Request path as issued by the caller
    pub url: String,
    /// Upper-case HTTP method
    pub method: String,
    pub reason: String,
}

/// Events published on the session bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The server rejected the session; the token has already been cleared
    Unauthorized(UnauthorizedDetail),
    /// UI state should be reset without a full reload
    SoftRefresh,
}

impl SessionEvent {
    /// Browser-style event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => EVENT_UNAUTHORIZED,
            Self::SoftRefresh => EVENT_SOFT_REFRESH,
        }
    }
}
