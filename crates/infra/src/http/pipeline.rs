//! Request and response stages of the HTTP pipeline.
//!
//! Each stage is a plain function so it can be tested without a transport:
//!
//! - [`prepare`]: descriptor → [`PreparedRequest`] (bearer token, correlation id)
//! - [`derive_error_message`] / [`normalize`]: [`Failure`] → [`ApiError`]
//! - [`unauthorized_detail`]: payload of the 401 notification
//!
//! [`ApiSession`](super::session::ApiSession) composes them around the
//! transport and the retry loop.

use std::collections::HashMap;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use stakeadmin_common::SignedHeaderSet;
use stakeadmin_domain::constants::{
    HEADER_AUTHORIZATION, HEADER_REQUEST_ID, MSG_UNAUTHORIZED_REASON, MSG_UNKNOWN_ERROR,
};
use stakeadmin_domain::{ApiError, BaseTarget, ErrorCode, UnauthorizedDetail};
use tracing::debug;
use url::Url;

use super::client::OriginClient;
use crate::errors::TransportFault;

/// A logical request as issued by a caller.
///
/// Defaults: target `api`, auth on, retry budget from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub target: BaseTarget,
    pub with_auth: bool,
    /// Per-request retry budget
    pub retry: Option<u32>,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            target: BaseTarget::default(),
            with_auth: true,
            retry: None,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn target(mut self, target: BaseTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_auth(mut self, with_auth: bool) -> Self {
        self.with_auth = with_auth;
        self
    }

    pub fn without_auth(self) -> Self {
        self.with_auth(false)
    }

    pub fn retry(mut self, budget: u32) -> Self {
        self.retry = Some(budget);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_REQUEST` error if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| {
            ApiError::new(format!("Failed to serialize body: {e}")).with_code(ErrorCode::InvalidRequest)
        })?;
        Ok(self.body(value))
    }

    /// Attach the `salt`, `X-Timestamp` and `hash` headers.
    pub fn signed(self, signature: &SignedHeaderSet) -> Self {
        signature.headers().iter().fold(self, |req, (name, value)| req.header(*name, *value))
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

/// A descriptor decorated for one attempt
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub path: String,
    pub target: BaseTarget,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub request_id: String,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    /// Build the transport request against `client`'s origin.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidRequest` fault for a bad URL or header.
    pub fn build(&self, client: &OriginClient) -> Result<reqwest::Request, TransportFault> {
        let url = client.url_for(&self.path)?;
        let mut builder = client.request(self.method.clone(), url);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }
        if let Some(body) = &self.body {
            builder = builder.json(body);
        }
        Ok(builder.build()?)
    }
}

/// Outbound stage: add the bearer token and a fresh correlation id.
///
/// `token` is consulted only when auth is on and the caller did not set
/// `Authorization` explicitly.
pub fn prepare(
    descriptor: &RequestDescriptor,
    token: impl FnOnce() -> Option<String>,
    request_id: String,
) -> PreparedRequest {
    let mut headers: Vec<(String, String)> = descriptor
        .headers
        .iter()
        .filter(|(k, _)| !k.eq_ignore_ascii_case(HEADER_REQUEST_ID))
        .cloned()
        .collect();

    if descriptor.with_auth && !descriptor.has_header(HEADER_AUTHORIZATION) {
        if let Some(token) = token() {
            headers.push((HEADER_AUTHORIZATION.to_string(), format!("Bearer {token}")));
        }
    }
    headers.push((HEADER_REQUEST_ID.to_string(), request_id.clone()));

    PreparedRequest {
        method: descriptor.method.clone(),
        path: descriptor.path.clone(),
        target: descriptor.target,
        headers,
        query: descriptor.query.clone(),
        body: descriptor.body.clone(),
        request_id,
    }
}

/// Debug trace of an outbound request
pub fn trace_outbound(prepared: &PreparedRequest, url: &Url) {
    debug!(
        method = %prepared.method,
        %url,
        query = ?prepared.query,
        body = ?prepared.body,
        request_id = %prepared.request_id,
        "[HTTP] →"
    );
}

/// HTTP error response, body already read
#[derive(Debug, Clone, PartialEq)]
pub struct HttpFailure {
    pub status: u16,
    /// Canonical reason phrase
    pub status_text: Option<String>,
    pub headers: HashMap<String, String>,
    /// JSON body, or the raw text when it is not JSON; `None` when empty
    pub body: Option<Value>,
}

impl HttpFailure {
    pub fn from_parts(
        status: u16,
        status_text: Option<&str>,
        headers: HashMap<String, String>,
        raw_body: &str,
    ) -> Self {
        Self {
            status,
            status_text: status_text.map(str::to_owned),
            headers,
            body: parse_body(raw_body),
        }
    }

    /// Non-empty string field of the body
    fn field(&self, name: &str) -> Option<&str> {
        self.body.as_ref()?.get(name)?.as_str().filter(|s| !s.is_empty())
    }
}

/// Why an attempt failed
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// No response
    Transport(TransportFault),
    /// Non-2xx response
    Http(HttpFailure),
}

/// JSON body if it parses, the raw text otherwise
pub fn parse_body(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
}

/// Lower-cased header map; non-UTF-8 values are dropped
pub fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect()
}

/// Echoed `x-request-id`, else the id the request was sent with
pub fn response_request_id(headers: &HashMap<String, String>, sent: &str) -> String {
    headers
        .get("x-request-id")
        .filter(|id| !id.is_empty())
        .cloned()
        .unwrap_or_else(|| sent.to_string())
}

/// Human-readable message for a failure.
///
/// Priority: body `message`, body `error`, body `errors` joined with `", "`,
/// the HTTP status line, the timeout message, the network message, the
/// transport's own message. Empty fields are skipped; an empty result becomes
/// the generic unknown-error message.
pub fn derive_error_message(failure: &Failure) -> String {
    let message = message_for(failure);
    if message.trim().is_empty() {
        MSG_UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

fn message_for(failure: &Failure) -> String {
    match failure {
        Failure::Http(http) => {
            if let Some(message) = http.field("message") {
                return message.to_string();
            }
            if let Some(error) = http.field("error") {
                return error.to_string();
            }
            if let Some(Value::Array(errors)) = http.body.as_ref().and_then(|b| b.get("errors")) {
                if !errors.is_empty() {
                    return errors.iter().map(error_entry_text).collect::<Vec<_>>().join(", ");
                }
            }
            format!(
                "HTTP Error {}: {}",
                http.status,
                http.status_text.as_deref().filter(|s| !s.is_empty()).unwrap_or("Unknown Error")
            )
        }
        Failure::Transport(fault) => fault.user_message(),
    }
}

fn error_entry_text(entry: &Value) -> String {
    match entry.get("message").and_then(Value::as_str).filter(|m| !m.is_empty()) {
        Some(message) => message.to_string(),
        None => match entry {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}

/// Fold a failure into the normalized error.
pub fn normalize(failure: &Failure, request_id: String) -> ApiError {
    let error = ApiError::new(derive_error_message(failure)).with_request_id(request_id);
    match failure {
        Failure::Http(http) => {
            let error = error.with_status(http.status).with_code(ErrorCode::for_status(http.status));
            match &http.body {
                Some(body) => error.with_details(body.clone()),
                None => error,
            }
        }
        Failure::Transport(fault) => error.with_code(fault.code()),
    }
}

/// Payload of the `auth:unauthorized` notification.
///
/// Reason priority: body `error`, body `message`, `"unauthorized"`.
pub fn unauthorized_detail(
    prepared: &PreparedRequest,
    http: &HttpFailure,
    request_id: String,
    at: i64,
) -> UnauthorizedDetail {
    let reason = http
        .field("error")
        .or_else(|| http.field("message"))
        .unwrap_or(MSG_UNAUTHORIZED_REASON)
        .to_string();
    UnauthorizedDetail {
        at,
        status: http.status,
        request_id: Some(request_id),
        url: prepared.path.clone(),
        method: prepared.method.as_str().to_ascii_uppercase(),
        reason,
    }
}
