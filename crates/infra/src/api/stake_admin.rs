use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use stakeadmin_domain::constants::PROFILE_STORAGE_KEY;
use stakeadmin_domain::{
    ApiError, ApiKeyData, BaseTarget, ClientApiKeyRequest, DataEnvelope, ErrorCode,
    FilterReportRequest, FilterRequest, MonthlyType, OperatorData, OperatorSummary, Page,
    TransactionData, UserPrivilege, UserProfile,
};
use tracing::{debug, instrument, warn};

use super::endpoints;
use crate::http::{ApiSession, RequestDescriptor};

/// Typed operations against the admin backend
#[derive(Debug)]
pub struct StakeAdminApi {
    session: ApiSession,
    current_operator: RwLock<Option<OperatorData>>,
}

impl StakeAdminApi {
    pub fn new(session: ApiSession) -> Self {
        Self { session, current_operator: RwLock::new(None) }
    }

    pub fn session(&self) -> &ApiSession {
        &self.session
    }

    /// Send `descriptor` and unwrap the backend's `{ "data": ... }` wrapper.
    async fn fetch<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T, ApiError> {
        let envelope = self.session.request::<DataEnvelope<T>>(descriptor).await?;
        let status = envelope.status;
        let request_id = envelope.request_id.clone();
        envelope.data.into_inner().ok_or_else(|| {
            let error = ApiError::new("Malformed response from server")
                .with_status(status)
                .with_code(ErrorCode::Decode);
            match request_id {
                Some(id) => error.with_request_id(id),
                None => error,
            }
        })
    }

    // === Operators ===

    #[instrument(skip(self, filter), fields(page = filter.page, size = filter.size))]
    pub async fn list_operators(&self, filter: &FilterRequest) -> Result<Page<OperatorData>, ApiError> {
        self.fetch(RequestDescriptor::get(endpoints::OPERATORS).query(filter.to_query())).await
    }

    #[instrument(skip(self))]
    pub async fn operator_metrics(&self, operator_id: &str) -> Result<OperatorSummary, ApiError> {
        self.fetch(RequestDescriptor::get(endpoints::operator_metrics(operator_id))).await
    }

    /// Operator bound to the current bearer token
    pub async fn operator_by_token(&self) -> Result<OperatorData, ApiError> {
        self.fetch(RequestDescriptor::get(endpoints::OPERATOR_BY_TOKEN)).await
    }

    /// Memoized [`Self::operator_by_token`]; failures yield `None` and are
    /// not cached.
    pub async fn current_operator(&self) -> Option<OperatorData> {
        if let Some(operator) = self.current_operator.read().clone() {
            return Some(operator);
        }
        match self.operator_by_token().await {
            Ok(operator) => {
                *self.current_operator.write() = Some(operator.clone());
                Some(operator)
            }
            Err(err) => {
                warn!(error = %err, status = ?err.status, "failed to fetch operator");
                None
            }
        }
    }

    pub fn forget_current_operator(&self) {
        *self.current_operator.write() = None;
    }

    // === Reports ===

    #[instrument(skip(self, filter), fields(page = filter.page, size = filter.size))]
    pub async fn winning_transactions(
        &self,
        filter: &FilterRequest,
    ) -> Result<Page<TransactionData>, ApiError> {
        self.fetch(RequestDescriptor::get(endpoints::WINNING_TRANSACTIONS).query(filter.to_query()))
            .await
    }

    #[instrument(skip(self, filter), fields(metric = %filter.metric))]
    pub async fn month_wise_metrics(
        &self,
        filter: &FilterReportRequest,
    ) -> Result<Vec<MonthlyType>, ApiError> {
        self.fetch(RequestDescriptor::get(endpoints::MONTHLY_METRICS).query(filter.to_query())).await
    }

    // === API-key clients ===

    pub async fn api_key_client(&self, public_id: &str) -> Result<ApiKeyData, ApiError> {
        self.fetch(RequestDescriptor::get(endpoints::api_client(public_id))).await
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_api_key_client(
        &self,
        request: &ClientApiKeyRequest,
    ) -> Result<ApiKeyData, ApiError> {
        let descriptor = RequestDescriptor::post(endpoints::API_CLIENTS).json(request)?;
        let created: ApiKeyData = self.fetch(descriptor).await?;
        debug!(public_id = ?created.public_id, "api key client created");
        Ok(created)
    }

    pub async fn rotate_api_key_client(&self, public_id: &str) -> Result<ApiKeyData, ApiError> {
        self.fetch(RequestDescriptor::post(endpoints::api_client_rotation(public_id))).await
    }

    // === Users ===

    /// Fetch the signed-in user's profile and keep a copy in app info
    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        let profile: UserProfile = self
            .fetch(RequestDescriptor::get(endpoints::USER_PROFILE).target(BaseTarget::ApiV1))
            .await?;
        self.session.app_info().set_json(PROFILE_STORAGE_KEY, &profile);
        Ok(profile)
    }

    /// Profile saved by the last [`Self::fetch_profile`]
    pub fn cached_profile(&self) -> Option<UserProfile> {
        self.session.app_info().get_json(PROFILE_STORAGE_KEY)
    }

    /// Permissions of `profile`, on the signed user endpoint
    pub async fn user_permissions(&self, profile: &UserProfile) -> Result<UserPrivilege, ApiError> {
        let signature = self.session.sign_for(profile)?;
        self.fetch(
            RequestDescriptor::get(endpoints::USER_PERMISSIONS)
                .target(BaseTarget::ApiV1)
                .signed(&signature),
        )
        .await
    }

    // === Authorization server ===

    /// Redirect URL of the login flow; sent without a bearer token
    pub async fn authorizer_url(&self) -> Result<String, ApiError> {
        self.fetch(
            RequestDescriptor::get(endpoints::AUTHORIZER_URL).target(BaseTarget::Auth).without_auth(),
        )
        .await
    }
}
