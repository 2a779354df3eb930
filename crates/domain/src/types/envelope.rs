//! Success envelopes

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Uniform success result of every pipeline call, regardless of target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
    pub data: T,
    pub status: u16,
    /// Lower-cased header names
    pub headers: HashMap<String, String>,
    /// Echoed `x-request-id`, or the id generated for the request
    pub request_id: Option<String>,
}

impl<T> ResponseEnvelope<T> {
    /// Replace the payload, keeping the transport metadata
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResponseEnvelope<U> {
        ResponseEnvelope {
            data: f(self.data),
            status: self.status,
            headers: self.headers,
            request_id: self.request_id,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Server-side wrapper: the backend nests payloads under `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> DataEnvelope<T> {
    pub fn into_inner(self) -> Option<T> {
        self.data
    }
}
