use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, Response};
use stakeadmin_domain::constants::{DEFAULT_REQUEST_TIMEOUT_MS, MIME_JSON};
use stakeadmin_domain::{ApiError, ErrorCode};
use tracing::debug;
use url::Url;

use crate::errors::TransportFault;

/// HTTP client bound to one backend origin.
///
/// Sends JSON by default and never stores or forwards cookies. Retry is not
/// handled here; see [`crate::http::session::ApiSession`].
#[derive(Debug)]
pub struct OriginClient {
    client: ReqwestClient,
    origin: String,
    timeout: Duration,
}

impl OriginClient {
    /// Start building a client for `origin`.
    pub fn builder(origin: impl Into<String>) -> OriginClientBuilder {
        OriginClientBuilder::new(origin)
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve `path` against the origin. Absolute URLs pass through.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL does not parse.
    pub fn url_for(&self, path: &str) -> Result<Url, TransportFault> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        let base = self.origin.trim_end_matches('/');
        let url = if path.is_empty() {
            base.to_string()
        } else if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        };
        Ok(Url::parse(&url)?)
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send a built request once.
    pub async fn execute(&self, request: Request) -> Result<Response, reqwest::Error> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");
        let response = self.client.execute(request).await?;
        debug!(%method, %url, status = %response.status(), "received HTTP response");
        Ok(response)
    }
}

/// Builder for [`OriginClient`].
#[derive(Debug)]
pub struct OriginClientBuilder {
    origin: String,
    timeout: Duration,
    default_headers: HeaderMap,
}

impl OriginClientBuilder {
    fn new(origin: impl Into<String>) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static(MIME_JSON));
        default_headers.insert(ACCEPT, HeaderValue::from_static(MIME_JSON));
        Self {
            origin: origin.into(),
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            default_headers,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OriginClient, ApiError> {
        let builder = ReqwestClient::builder()
            .timeout(self.timeout)
            .default_headers(self.default_headers)
            .no_proxy();

        let client = builder.build().map_err(|err| {
            ApiError::new(format!("failed to build HTTP client for {}: {err}", self.origin))
                .with_code(ErrorCode::InvalidRequest)
        })?;

        debug!(origin = %self.origin, timeout = ?self.timeout, "built origin client");
        Ok(OriginClient { client, origin: self.origin, timeout: self.timeout })
    }
}
