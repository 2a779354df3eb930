//! Typed API facade against a mock backend.

use std::sync::Arc;

use serde_json::json;
use stakeadmin_common::storage::MemoryStore;
use stakeadmin_common::testing::{FixedClock, FixedSalt};
use stakeadmin_common::CredentialSigner;
use stakeadmin_domain::{
    ClientApiKeyRequest, ClientConfig, ErrorCode, FilterReportRequest, FilterRequest,
    RetrySettings, SignerConfig, UserProfile,
};
use stakeadmin_infra::{ApiSession, StakeAdminApi};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Backend {
    api: MockServer,
    users: MockServer,
    auth: MockServer,
}

impl Backend {
    async fn start() -> Self {
        Self {
            api: MockServer::start().await,
            users: MockServer::start().await,
            auth: MockServer::start().await,
        }
    }

    fn facade(&self) -> StakeAdminApi {
        let config = ClientConfig {
            auth_base_url: Some(self.auth.uri()),
            api_base_url: Some(self.api.uri()),
            user_api_base_url: Some(self.users.uri()),
            request_timeout_ms: 500,
            retry: RetrySettings { budget: 1, base_delay_ms: 5, max_delay_ms: 10 },
            ..Default::default()
        };
        let clock = FixedClock::at_millis(1_700_000_000_000);
        let signer = CredentialSigner::new(SignerConfig::new("facade-secret"))
            .unwrap()
            .with_salt_source(FixedSalt::new(vec![7; 16]))
            .with_clock(clock.clone());
        let session = ApiSession::builder(config)
            .store(Arc::new(MemoryStore::new()))
            .clock(Arc::new(clock))
            .signer(signer)
            .build()
            .unwrap();
        session.login("tok");
        StakeAdminApi::new(session)
    }
}

fn profile() -> UserProfile {
    serde_json::from_value(json!({
        "username": "ada",
        "publicId": "u-1",
        "profile": {"settings": {"role": "ADMIN"}}
    }))
    .unwrap()
}

#[tokio::test]
async fn list_operators_unwraps_data_envelope() {
    let backend = Backend::start().await;
    Mock::given(method("GET"))
        .and(path("/operators"))
        .and(query_param("page", "1"))
        .and(query_param("size", "20"))
        .and(query_param("search", "lucky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "content": [{"publicId": "op-1", "name": "Lucky Bet"}],
                "totalElements": 21,
                "totalPages": 2,
                "number": 1,
                "size": 20
            }
        })))
        .expect(1)
        .mount(&backend.api)
        .await;

    let filter = FilterRequest { search: Some("lucky".into()), ..FilterRequest::page(1, 20) };
    let page = backend.facade().list_operators(&filter).await.unwrap();

    assert_eq!(page.total_elements, 21);
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].name, "Lucky Bet");
}

#[tokio::test]
async fn missing_payload_is_malformed_response() {
    let backend = Backend::start().await;
    Mock::given(method("GET"))
        .and(path("/reports/monthly"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(&backend.api)
        .await;

    let filter = FilterReportRequest { metric: "stakes".into(), ..Default::default() };
    let err = backend.facade().month_wise_metrics(&filter).await.unwrap_err();

    assert_eq!(err.message, "Malformed response from server");
    assert_eq!(err.code, Some(ErrorCode::Decode));
    assert_eq!(err.status, Some(200));
}

#[tokio::test]
async fn current_operator_caches_success_only() {
    let backend = Backend::start().await;
    let api = backend.facade();

    Mock::given(method("GET"))
        .and(path("/operators/me"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "down"})))
        .up_to_n_times(1)
        .expect(1)
        .mount(&backend.api)
        .await;
    assert!(api.current_operator().await.is_none());

    Mock::given(method("GET"))
        .and(path("/operators/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"publicId": "op-9", "name": "Mine"}})),
        )
        .expect(1)
        .mount(&backend.api)
        .await;

    let first = api.current_operator().await.expect("fetched");
    let second = api.current_operator().await.expect("cached");
    assert_eq!(first.public_id, "op-9");
    assert_eq!(first, second);

    api.forget_current_operator();
    assert_eq!(backend.api.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn create_api_key_client_posts_json_once() {
    let backend = Backend::start().await;
    Mock::given(method("POST"))
        .and(path("/api-clients"))
        .and(body_json(json!({"name": "terminal-app"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"publicId": "k-1", "name": "terminal-app", "apiKey": "secret-key"}
        })))
        .expect(1)
        .mount(&backend.api)
        .await;

    let request = ClientApiKeyRequest { name: "terminal-app".into(), ..Default::default() };
    let created = backend.facade().create_api_key_client(&request).await.unwrap();

    assert_eq!(created.public_id.as_deref(), Some("k-1"));
    assert_eq!(created.api_key, "secret-key");
}

#[tokio::test]
async fn profile_is_fetched_from_user_api_and_cached() {
    let backend = Backend::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {
            "username": "ada",
            "publicId": "u-1",
            "profile": {"firstName": "Ada", "settings": {"role": "ADMIN"}}
        }})))
        .expect(1)
        .mount(&backend.users)
        .await;

    let api = backend.facade();
    assert!(api.cached_profile().is_none());

    let fetched = api.fetch_profile().await.unwrap();
    assert_eq!(fetched.profile.first_name, "Ada");
    assert_eq!(api.cached_profile(), Some(fetched));
}

#[tokio::test]
async fn user_permissions_carry_signed_headers() {
    let backend = Backend::start().await;
    Mock::given(method("GET"))
        .and(path("/users/permissions"))
        .and(header_exists("salt"))
        .and(header("x-timestamp", "1700000000000"))
        .and(header_exists("hash"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"permissions": ["operators:read"]}})),
        )
        .expect(1)
        .mount(&backend.users)
        .await;

    let api = backend.facade();
    let privilege = api.user_permissions(&profile()).await.unwrap();
    assert_eq!(privilege.permissions, vec!["operators:read".to_string()]);

    let sent = &backend.users.received_requests().await.unwrap()[0];
    let expected = api.session().sign_for(&profile()).unwrap();
    assert_eq!(sent.headers.get("hash").unwrap().to_str().unwrap(), expected.hash);
    assert_eq!(sent.headers.get("salt").unwrap().to_str().unwrap(), expected.salt);
}

#[tokio::test]
async fn authorizer_url_goes_to_auth_origin_without_bearer() {
    let backend = Backend::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2/authorizer-url"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": "https://auth.example.org/authorize?client=x"})),
        )
        .expect(1)
        .mount(&backend.auth)
        .await;

    let url = backend.facade().authorizer_url().await.unwrap();
    assert_eq!(url, "https://auth.example.org/authorize?client=x");

    let sent = &backend.auth.received_requests().await.unwrap()[0];
    assert!(sent.headers.get("authorization").is_none());
}
