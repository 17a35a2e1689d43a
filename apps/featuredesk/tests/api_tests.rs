//! Integration tests for the FeatureDesk HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
// Allow holding MutexGuard across await - tests are serialized
// intentionally to avoid env var conflicts
#![allow(clippy::unwrap_used, clippy::panic, clippy::await_holding_lock)]

use async_trait::async_trait;
use axum::http::{HeaderValue, header};
use axum_test::TestServer;
use featuredesk::AppConfig;
use featuredesk::api::{
    API_KEY_VAR, ApiResponse, AppState, FeatureResponse, HealthResponse,
    INTERNAL_ERROR_MESSAGE, RATE_LIMIT_VAR, create_router,
};
use featuredesk::config::Environment;
use featuredesk_core::{
    Feature, FeatureId, FeatureService, FeatureStore, InMemoryFeatureStore, NewFeature,
    StoreError, StoreResult, bootstrap,
};
use mockable::DefaultClock;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Mutex to serialize tests since they modify env vars.
static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Guard wrapper that holds the mutex and ensures cleanup on drop.
struct TestGuard {
    _guard: std::sync::MutexGuard<'static, ()>,
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        clear_env();
    }
}

fn clear_env() {
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe {
        std::env::remove_var(API_KEY_VAR);
        std::env::remove_var(RATE_LIMIT_VAR);
    }
}

fn lock_env() -> TestGuard {
    let guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    TestGuard { _guard: guard }
}

async fn build_server(seed: bool) -> TestServer {
    let store = InMemoryFeatureStore::new();
    if seed {
        bootstrap::seed_if_empty(&store, &DefaultClock).await.unwrap();
    }
    let service = FeatureService::new(Arc::new(store));
    let state = AppState::new(service, AppConfig::default());
    TestServer::new(create_router(state)).unwrap()
}

/// Create a test server over an empty store.
/// Returns a guard that must be kept alive during the test.
async fn create_test_server() -> (TestServer, TestGuard) {
    let guard = lock_env();
    (build_server(false).await, guard)
}

/// Create a test server over the six seed features.
async fn create_seeded_test_server() -> (TestServer, TestGuard) {
    let guard = lock_env();
    (build_server(true).await, guard)
}

fn create_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "# Title\n\nSome **bold** text",
        "status": "Active",
        "category": "Tools",
        "icon": "mdi-wrench"
    })
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _guard) = create_test_server().await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "Healthy");
    assert_eq!(health.name, "FeatureDesk");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// LIST / GET TESTS
// =============================================================================

#[tokio::test]
async fn test_list_empty() {
    let (server, _guard) = create_test_server().await;

    let response = server.get("/features").await;

    response.assert_status_ok();
    let body: ApiResponse<Vec<FeatureResponse>> = response.json();
    assert!(body.success);
    assert_eq!(body.message, "Features retrieved successfully");
    assert_eq!(body.data.unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_seeded_is_ordered_by_name() {
    let (server, _guard) = create_seeded_test_server().await;

    let body: ApiResponse<Vec<FeatureResponse>> = server.get("/features").await.json();
    let names: Vec<String> = body.data.unwrap().into_iter().map(|f| f.name).collect();

    assert_eq!(
        names,
        [
            "AdBlock",
            "Analytics",
            "Backup",
            "Database",
            "DevTools",
            "UserManagement"
        ]
    );
}

#[tokio::test]
async fn test_get_by_id() {
    let (server, _guard) = create_seeded_test_server().await;

    let response = server.get("/features/1").await;

    response.assert_status_ok();
    let body: ApiResponse<FeatureResponse> = response.json();
    assert_eq!(body.message, "Feature retrieved successfully");
    let feature = body.data.unwrap();
    assert_eq!(feature.id, 1);
    assert_eq!(feature.name, "AdBlock");
}

#[tokio::test]
async fn test_get_missing_returns_404_envelope() {
    let (server, _guard) = create_seeded_test_server().await;

    let response = server.get("/features/999").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Feature not found");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_get_non_numeric_id_is_404() {
    let (server, _guard) = create_seeded_test_server().await;

    let response = server.get("/features/abc").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_get_by_name() {
    let (server, _guard) = create_seeded_test_server().await;

    let response = server.get("/features/by-name/Backup").await;

    response.assert_status_ok();
    let body: ApiResponse<FeatureResponse> = response.json();
    assert_eq!(body.data.unwrap().name, "Backup");

    let response = server.get("/features/by-name/backup").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_feature_json_is_camel_case() {
    let (server, _guard) = create_seeded_test_server().await;

    let body: Value = server.get("/features/5").await.json();
    let data = &body["data"];

    assert_eq!(data["name"], "Analytics");
    assert_eq!(data["usageCount"], 0);
    assert!(data["lastUsed"].is_null());
    assert!(data.get("lastUpdated").is_some());
    assert!(data.get("usage_count").is_none());
}

// =============================================================================
// DESCRIPTION ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_description_renders_markdown() {
    let (server, _guard) = create_seeded_test_server().await;

    let response = server.get("/features/1/description").await;

    response.assert_status_ok();
    let content_type = response.header(header::CONTENT_TYPE);
    assert!(content_type.to_str().unwrap().starts_with("text/html"));
    let html = response.text();
    assert!(html.contains("<h1>Ad Block Feature</h1>"));
    assert!(html.contains("<strong>Blocks unwanted advertisements</strong>"));
}

#[tokio::test]
async fn test_description_neutralizes_script() {
    let (server, _guard) = create_test_server().await;

    let mut body = create_body("Scripted");
    body["description"] = json!("Hello <script>alert('x')</script> world");
    server.post("/features").json(&body).await;

    let html = server.get("/features/1/description").await.text();

    assert!(!html.contains("<script"));
    assert!(html.contains("Hello"));
}

#[tokio::test]
async fn test_description_missing_feature() {
    let (server, _guard) = create_test_server().await;

    let response = server.get("/features/42/description").await;

    response.assert_status_not_found();
}

// =============================================================================
// CREATE TESTS
// =============================================================================

#[tokio::test]
async fn test_create_returns_201_with_location() {
    let (server, _guard) = create_test_server().await;

    let response = server.post("/features").json(&create_body("Exporter")).await;

    assert_eq!(response.status_code().as_u16(), 201);
    let location = response.header(header::LOCATION);
    assert_eq!(location.to_str().unwrap(), "/features/1");

    let body: ApiResponse<FeatureResponse> = response.json();
    assert!(body.success);
    assert_eq!(body.message, "Feature created successfully");
    let feature = body.data.unwrap();
    assert_eq!(feature.name, "Exporter");
    assert_eq!(feature.usage_count, 0);
    assert_eq!(feature.success_rate, 0);
    assert_eq!(feature.error_count, 0);
    assert!(feature.last_used.is_none());

    server.get("/features/1").await.assert_status_ok();
}

#[tokio::test]
async fn test_create_validation_errors_listed() {
    let (server, _guard) = create_test_server().await;

    let body = json!({
        "name": "",
        "description": "d",
        "status": "x".repeat(51),
        "category": "c",
        "icon": "i"
    });
    let response = server.post("/features").json(&body).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    let errors: Vec<String> = serde_json::from_value(body["errors"].clone()).unwrap();
    assert_eq!(
        errors,
        [
            "The Name field is required.",
            "The Status field must be a string with a maximum length of 50."
        ]
    );

    let listed: ApiResponse<Vec<FeatureResponse>> = server.get("/features").await.json();
    assert!(listed.data.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_missing_fields_is_validation_failure() {
    let (server, _guard) = create_test_server().await;

    let response = server.post("/features").json(&json!({"name": "Only"})).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_create_duplicate_name_is_400() {
    let (server, _guard) = create_seeded_test_server().await;

    let response = server.post("/features").json(&create_body("AdBlock")).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Feature name already exists");
    assert_eq!(
        body["errors"][0],
        "A feature with the name 'AdBlock' already exists"
    );
}

#[tokio::test]
async fn test_invalid_json_body() {
    let (server, _guard) = create_test_server().await;

    let response = server
        .post("/features")
        .text("not valid json")
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid request body");
    assert!(body["errors"].is_array());
}

// =============================================================================
// UPDATE TESTS
// =============================================================================

#[tokio::test]
async fn test_update_overwrites_non_blank_fields() {
    let (server, _guard) = create_seeded_test_server().await;

    let before: ApiResponse<FeatureResponse> = server.get("/features/2").await.json();
    let before = before.data.unwrap();

    let response = server
        .put("/features/2")
        .json(&json!({"status": "Inactive", "category": "  ", "icon": null}))
        .await;

    response.assert_status_ok();
    let body: ApiResponse<FeatureResponse> = response.json();
    assert_eq!(body.message, "Feature updated successfully");
    let after = body.data.unwrap();
    assert_eq!(after.status, "Inactive");
    assert_eq!(after.category, before.category);
    assert_eq!(after.icon, before.icon);
    assert_eq!(after.name, before.name);
    assert_eq!(after.usage_count, before.usage_count);
    assert!(after.last_updated >= before.last_updated);
}

#[tokio::test]
async fn test_update_ignores_name() {
    let (server, _guard) = create_seeded_test_server().await;

    let response = server
        .put("/features/1")
        .json(&json!({"name": "Renamed"}))
        .await;

    response.assert_status_ok();
    let body: ApiResponse<FeatureResponse> = response.json();
    assert_eq!(body.data.unwrap().name, "AdBlock");
}

#[tokio::test]
async fn test_update_missing_returns_404() {
    let (server, _guard) = create_test_server().await;

    let response = server
        .put("/features/77")
        .json(&json!({"status": "Active"}))
        .await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Feature not found");
}

// =============================================================================
// DELETE TESTS
// =============================================================================

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let (server, _guard) = create_seeded_test_server().await;

    let response = server.delete("/features/3").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Feature deleted successfully");
    assert!(body.get("data").is_none());

    server.get("/features/3").await.assert_status_not_found();
    server.delete("/features/3").await.assert_status_not_found();
}

// =============================================================================
// ERROR HANDLING TESTS
// =============================================================================

#[tokio::test]
async fn test_404_on_unknown_endpoint() {
    let (server, _guard) = create_test_server().await;

    let response = server.get("/unknown").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Resource not found");
}

#[tokio::test]
async fn test_method_not_allowed() {
    let (server, _guard) = create_test_server().await;

    // /health is GET only
    let response = server.post("/health").await;
    assert_eq!(response.status_code().as_u16(), 405);
}

// =============================================================================
// RATE LIMIT TESTS
// =============================================================================

#[tokio::test]
async fn test_rate_limit_exceeded_returns_envelope() {
    let _guard = lock_env();
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::set_var(RATE_LIMIT_VAR, "1") };
    let server = build_server(false).await;

    server.get("/health").await.assert_status_ok();
    let response = server.get("/health").await;

    assert_eq!(response.status_code().as_u16(), 429);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

// =============================================================================
// AUTHENTICATION MIDDLEWARE TESTS
// =============================================================================

/// Create a test server with authentication enabled.
/// Must be called while holding ENV_TEST_MUTEX.
async fn create_auth_test_server(api_key: &str) -> TestServer {
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::set_var(API_KEY_VAR, api_key) };
    build_server(true).await
}

#[tokio::test]
async fn test_auth_valid_bearer_token() {
    let _guard = lock_env();
    let api_key = "test-secret-key-12345";
    let server = create_auth_test_server(api_key).await;

    let response = server
        .get("/features")
        .add_header(
            header::AUTHORIZATION,
            format!("Bearer {}", api_key)
                .parse::<HeaderValue>()
                .unwrap(),
        )
        .await;

    response.assert_status_ok();
    let body: ApiResponse<Vec<FeatureResponse>> = response.json();
    assert_eq!(body.data.unwrap().len(), 6);
}

#[tokio::test]
async fn test_auth_valid_raw_token() {
    let _guard = lock_env();
    let api_key = "test-raw-key-67890";
    let server = create_auth_test_server(api_key).await;

    let response = server
        .get("/features")
        .add_header(header::AUTHORIZATION, api_key.parse::<HeaderValue>().unwrap())
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_invalid_token_rejected() {
    let _guard = lock_env();
    let server = create_auth_test_server("correct-key").await;

    let response = server
        .get("/features")
        .add_header(
            header::AUTHORIZATION,
            "Bearer wrong-key".parse::<HeaderValue>().unwrap(),
        )
        .await;

    assert_eq!(
        response.status_code().as_u16(),
        401,
        "Invalid token should return 401 Unauthorized"
    );
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn test_auth_missing_header_rejected() {
    let _guard = lock_env();
    let server = create_auth_test_server("required-key").await;

    let response = server.post("/features").json(&create_body("Sneaky")).await;

    assert_eq!(response.status_code().as_u16(), 401);
}

#[tokio::test]
async fn test_auth_health_endpoint_bypasses_auth() {
    let _guard = lock_env();
    let server = create_auth_test_server("secret-key-for-bypass-test").await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "Healthy");
}

#[tokio::test]
async fn test_auth_bearer_prefix_only_rejected() {
    let _guard = lock_env();
    let server = create_auth_test_server("actual-key").await;

    let response = server
        .get("/features")
        .add_header(
            header::AUTHORIZATION,
            "Bearer ".parse::<HeaderValue>().unwrap(),
        )
        .await;

    assert_eq!(response.status_code().as_u16(), 401);
}

// =============================================================================
// INTERNAL FAILURE TESTS
// =============================================================================

/// A store that fails every call, either with an error or by panicking.
#[derive(Debug, Clone, Copy)]
struct FailingStore {
    panics: bool,
}

impl FailingStore {
    fn fail<T>(self) -> StoreResult<T> {
        if self.panics {
            panic!("feature table exploded");
        }
        Err(StoreError::persistence(std::io::Error::other(
            "database is locked",
        )))
    }
}

#[async_trait]
impl FeatureStore for FailingStore {
    async fn get_all(&self) -> StoreResult<Vec<Feature>> {
        self.fail()
    }

    async fn get_by_id(&self, _id: FeatureId) -> StoreResult<Option<Feature>> {
        self.fail()
    }

    async fn get_by_name(&self, _name: &str) -> StoreResult<Option<Feature>> {
        self.fail()
    }

    async fn create(&self, _feature: &NewFeature) -> StoreResult<FeatureId> {
        self.fail()
    }

    async fn update(&self, _feature: &Feature) -> StoreResult<bool> {
        self.fail()
    }

    async fn delete(&self, _id: FeatureId) -> StoreResult<bool> {
        self.fail()
    }

    async fn exists(&self, _name: &str, _exclude_id: Option<FeatureId>) -> StoreResult<bool> {
        self.fail()
    }

    async fn count(&self) -> StoreResult<u64> {
        self.fail()
    }
}

fn failing_server(store: FailingStore, environment: Environment) -> TestServer {
    let config = AppConfig {
        environment,
        ..AppConfig::default()
    };
    let state = AppState::new(FeatureService::new(Arc::new(store)), config);
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_storage_failure_is_generic_500_in_production() {
    let _guard = lock_env();
    let server = failing_server(FailingStore { panics: false }, Environment::Production);

    let response = server.get("/features").await;

    assert_eq!(response.status_code().as_u16(), 500);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
    assert!(body.get("errors").is_none());
    assert!(!response.text().contains("database is locked"));
}

#[tokio::test]
async fn test_storage_failure_carries_detail_in_development() {
    let _guard = lock_env();
    let server = failing_server(FailingStore { panics: false }, Environment::Development);

    let response = server.get("/features/1").await;

    assert_eq!(response.status_code().as_u16(), 500);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
    let detail = body["errors"][0].as_str().unwrap();
    assert!(detail.contains("database is locked"), "detail was {detail}");
}

#[tokio::test]
async fn test_handler_panic_is_500_envelope() {
    let _guard = lock_env();
    let server = failing_server(FailingStore { panics: true }, Environment::Production);

    let response = server.get("/features").await;

    assert_eq!(response.status_code().as_u16(), 500);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn test_handler_panic_message_shown_in_development() {
    let _guard = lock_env();
    let server = failing_server(FailingStore { panics: true }, Environment::Development);

    let response = server.get("/features").await;

    assert_eq!(response.status_code().as_u16(), 500);
    let body: Value = response.json();
    let detail = body["errors"][0].as_str().unwrap();
    assert!(detail.contains("feature table exploded"), "detail was {detail}");
}
