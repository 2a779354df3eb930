//! Composition root of the HTTP core.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use stakeadmin_common::crypto::generate_request_id;
use stakeadmin_common::storage::{AppInfoStore, FileStore, MemoryStore, SharedStore};
use stakeadmin_common::{Clock, CredentialSigner, SessionEvents, SignedHeaderSet, SystemClock, TokenStore};
use stakeadmin_domain::{
    ApiError, ClientConfig, ErrorCode, ResponseEnvelope, SessionEvent, StakeAdminError, UserProfile,
};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use super::client::OriginClient;
use super::pipeline::{
    header_map, normalize, parse_body, prepare, response_request_id, trace_outbound,
    unauthorized_detail, Failure, HttpFailure, PreparedRequest, RequestDescriptor,
};
use super::retry::{RetryDecision, RetryPolicy};
use super::router::BaseRouter;
use crate::errors::TransportFault;

/// Owns the token store, app-info store, router, event bus and signer, and
/// runs every request through the pipeline.
///
/// Cloning is cheap; clones share all state.
#[derive(Clone)]
pub struct ApiSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: ClientConfig,
    router: BaseRouter,
    tokens: TokenStore,
    app_info: AppInfoStore,
    events: SessionEvents,
    signer: Option<CredentialSigner>,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ApiSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSession")
            .field("router", &self.inner.router)
            .field("app_info", &self.inner.app_info)
            .field("signer", &self.inner.signer)
            .finish_non_exhaustive()
    }
}

/// Successful response, body still raw
struct RawResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: String,
}

impl ApiSession {
    /// Session with storage and signer taken from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if file storage cannot be opened or the signer
    /// configuration is unusable.
    pub fn new(config: ClientConfig) -> Result<Self, StakeAdminError> {
        Self::builder(config).build()
    }

    pub fn builder(config: ClientConfig) -> ApiSessionBuilder {
        ApiSessionBuilder::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn router(&self) -> &BaseRouter {
        &self.inner.router
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    pub fn app_info(&self) -> &AppInfoStore {
        &self.inner.app_info
    }

    pub fn events(&self) -> &SessionEvents {
        &self.inner.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Broadcast `app:soft-refresh`
    pub fn request_soft_refresh(&self) {
        self.inner.events.request_soft_refresh();
    }

    /* ---------------------------------------------------------------------- */
    /* Session lifecycle */
    /* ---------------------------------------------------------------------- */

    /// Store the token issued by a successful login
    pub fn login(&self, token: &str) {
        self.inner.tokens.set_auth_token(Some(token));
        info!(authenticated = self.inner.tokens.is_authenticated(), "session logged in");
    }

    /// Drop the token and every app-info entry under this deployment's prefix
    pub fn logout(&self) {
        self.inner.tokens.clear_auth_token();
        self.inner.app_info.clear_all_app_info();
        info!("session logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.tokens.is_authenticated()
    }

    /* ---------------------------------------------------------------------- */
    /* Signing */
    /* ---------------------------------------------------------------------- */

    /// Signed headers for the given identity.
    ///
    /// # Errors
    ///
    /// Returns an error if no signer is configured or signing fails.
    pub fn sign(
        &self,
        public_id: &str,
        username: &str,
        role: &str,
    ) -> Result<SignedHeaderSet, StakeAdminError> {
        let signer = self
            .inner
            .signer
            .as_ref()
            .ok_or_else(|| StakeAdminError::Config("no request signer configured".into()))?;
        Ok(signer.sign(public_id, username, role)?)
    }

    /// Signed headers for a user profile
    ///
    /// # Errors
    ///
    /// See [`ApiSession::sign`].
    pub fn sign_for(&self, profile: &UserProfile) -> Result<SignedHeaderSet, StakeAdminError> {
        self.sign(&profile.public_id, &profile.username, profile.role())
    }

    /* ---------------------------------------------------------------------- */
    /* Verb helpers */
    /* ---------------------------------------------------------------------- */

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ResponseEnvelope<T>, ApiError> {
        self.request(RequestDescriptor::new(Method::GET, path)).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        self.request(RequestDescriptor::new(Method::DELETE, path)).await
    }

    pub async fn head(&self, path: &str) -> Result<ResponseEnvelope<Value>, ApiError> {
        self.request(RequestDescriptor::new(Method::HEAD, path)).await
    }

    pub async fn options<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        self.request(RequestDescriptor::new(Method::OPTIONS, path)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<ResponseEnvelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(RequestDescriptor::new(Method::POST, path).json(body)?).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<ResponseEnvelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(RequestDescriptor::new(Method::PUT, path).json(body)?).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<ResponseEnvelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(RequestDescriptor::new(Method::PATCH, path).json(body)?).await
    }

    /* ---------------------------------------------------------------------- */
    /* Pipeline */
    /* ---------------------------------------------------------------------- */

    /// Issue `descriptor` and return the decoded envelope or the normalized
    /// error.
    ///
    /// Idempotent requests that fail without a response are retried with
    /// exponential backoff. A 401 clears the token and broadcasts
    /// `auth:unauthorized` before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for every failure, after retries are exhausted.
    #[instrument(
        skip_all,
        fields(method = %descriptor.method, path = %descriptor.path, target = %descriptor.target)
    )]
    pub async fn request<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        let client = self.inner.router.resolve(descriptor.target)?;
        let policy = self.inner.retry.with_budget(descriptor.retry);
        let mut retries = 0u32;

        loop {
            let prepared = prepare(
                &descriptor,
                || self.inner.tokens.get_auth_token(),
                generate_request_id(),
            );

            let failure = match self.attempt(&client, &prepared).await {
                Ok(raw) => return decode(raw, &prepared),
                Err(failure) => failure,
            };

            match policy.decide(&prepared.method, &failure, retries) {
                RetryDecision::Retry { attempt, delay } => {
                    if let Failure::Transport(fault) = &failure {
                        warn!(
                            attempt,
                            budget = policy.budget(),
                            delay = ?delay,
                            request_id = %prepared.request_id,
                            fault = %fault,
                            "retrying idempotent request"
                        );
                    }
                    retries = attempt;
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::GiveUp => return Err(self.surface(&prepared, failure)),
            }
        }
    }

    async fn attempt(
        &self,
        client: &OriginClient,
        prepared: &PreparedRequest,
    ) -> Result<RawResponse, Failure> {
        let request = prepared.build(client).map_err(Failure::Transport)?;
        if self.inner.config.trace_requests {
            trace_outbound(prepared, request.url());
        }

        let response = client
            .execute(request)
            .await
            .map_err(|err| Failure::Transport(TransportFault::from(err)))?;
        let status = response.status();
        let headers = header_map(response.headers());
        let body = response.text().await.map_err(|err| Failure::Transport(err.into()))?;

        if status.is_success() {
            if self.inner.config.trace_requests {
                debug!(status = status.as_u16(), request_id = %prepared.request_id, "[HTTP] ←");
            }
            Ok(RawResponse { status: status.as_u16(), headers, body })
        } else {
            Err(Failure::Http(HttpFailure::from_parts(
                status.as_u16(),
                status.canonical_reason(),
                headers,
                &body,
            )))
        }
    }

    fn surface(&self, prepared: &PreparedRequest, failure: Failure) -> ApiError {
        let request_id = match &failure {
            Failure::Http(http) => response_request_id(&http.headers, &prepared.request_id),
            Failure::Transport(_) => prepared.request_id.clone(),
        };

        if let Failure::Http(http) = &failure {
            if http.status == 401 {
                self.handle_unauthorized(prepared, http, &request_id);
            }
        }

        let error = normalize(&failure, request_id);
        if self.inner.config.should_log_http_errors() {
            warn!(
                status = ?error.status,
                code = ?error.code,
                url = %prepared.path,
                request_id = ?error.request_id,
                message = %error.message,
                "[HTTP] ×"
            );
        }
        error
    }

    fn handle_unauthorized(&self, prepared: &PreparedRequest, http: &HttpFailure, request_id: &str) {
        self.inner.tokens.clear_auth_token();
        let detail = unauthorized_detail(
            prepared,
            http,
            request_id.to_string(),
            self.inner.clock.millis_since_epoch(),
        );
        self.inner.events.notify_unauthorized(detail);
    }
}

fn decode<T: DeserializeOwned>(
    raw: RawResponse,
    prepared: &PreparedRequest,
) -> Result<ResponseEnvelope<T>, ApiError> {
    let request_id = response_request_id(&raw.headers, &prepared.request_id);
    let value = parse_body(&raw.body).unwrap_or(Value::Null);
    let data = serde_json::from_value(value).map_err(|err| {
        ApiError::new(format!("Failed to parse response: {err}"))
            .with_status(raw.status)
            .with_code(ErrorCode::Decode)
            .with_request_id(request_id.clone())
    })?;
    Ok(ResponseEnvelope { data, status: raw.status, headers: raw.headers, request_id: Some(request_id) })
}

/// Builder for [`ApiSession`]
pub struct ApiSessionBuilder {
    config: ClientConfig,
    store: Option<SharedStore>,
    events: Option<SessionEvents>,
    signer: Option<CredentialSigner>,
    clock: Option<Arc<dyn Clock>>,
}

impl ApiSessionBuilder {
    fn new(config: ClientConfig) -> Self {
        Self { config, store: None, events: None, signer: None, clock: None }
    }

    /// Use `store` instead of the backend named in the configuration
    pub fn store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Publish on an existing bus
    pub fn events(mut self, events: SessionEvents) -> Self {
        self.events = Some(events);
        self
    }

    pub fn signer(mut self, signer: CredentialSigner) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// # Errors
    ///
    /// Returns an error if file storage cannot be opened or the signer
    /// configuration is unusable.
    pub fn build(self) -> Result<ApiSession, StakeAdminError> {
        let config = self.config;

        let store: SharedStore = match (self.store, &config.storage_path) {
            (Some(store), _) => store,
            (None, Some(path)) => Arc::new(FileStore::open(path)?),
            (None, None) => Arc::new(MemoryStore::new()),
        };

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let signer = match (self.signer, &config.signer) {
            (Some(signer), _) => Some(signer),
            (None, Some(settings)) => {
                Some(CredentialSigner::new(settings.clone())?.with_clock(Arc::clone(&clock)))
            }
            (None, None) => None,
        };

        let app_info = AppInfoStore::new(store, config.storage_prefix.clone());
        let session = SessionInner {
            router: BaseRouter::new(&config),
            tokens: TokenStore::from_app_info(app_info.clone()),
            app_info,
            events: self.events.unwrap_or_else(|| SessionEvents::new(config.event_capacity)),
            signer,
            retry: RetryPolicy::from_settings(&config.retry),
            clock,
            config,
        };
        debug!(
            prefix = %session.config.storage_prefix,
            signed = session.signer.is_some(),
            "api session ready"
        );
        Ok(ApiSession { inner: Arc::new(session) })
    }
}
