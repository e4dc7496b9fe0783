// HTTP-level tests for the auth endpoints
// Runs the real router over an in-memory user store and a fake image host

use super::*;
use crate::auth::repository::InMemoryUserStore;
use crate::media::FakeUploader;
use axum::http::{header, HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::json;

const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

// ============================================================================
// Test Helpers
// ============================================================================

struct TestApp {
    server: TestServer,
    users: Arc<InMemoryUserStore>,
    uploader: Arc<FakeUploader>,
    tokens: Arc<TokenService>,
}

fn create_test_app_with(uploader: FakeUploader) -> TestApp {
    let users = Arc::new(InMemoryUserStore::new());
    let uploader = Arc::new(uploader);
    let tokens = Arc::new(TokenService::new(TEST_SECRET));
    let accounts = AccountService::new(users.clone(), uploader.clone(), tokens.clone());

    let server = TestServer::new(create_router(AppState::new(accounts))).unwrap();
    TestApp {
        server,
        users,
        uploader,
        tokens,
    }
}

fn create_test_app() -> TestApp {
    create_test_app_with(FakeUploader::default())
}

fn credentials_form(email: &str, password: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("email", email.to_string())
        .add_text("password", password.to_string())
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

async fn register(app: &TestApp, email: &str, password: &str) -> RegisterResponse {
    let response = app
        .server
        .post("/register")
        .multipart(credentials_form(email, password))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

// ============================================================================
// GET /
// ============================================================================

#[tokio::test]
async fn test_root_greets() {
    let app = create_test_app();

    let response = app.server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(!response.text().is_empty());
}

// ============================================================================
// POST /register
// ============================================================================

#[tokio::test]
async fn test_register_without_image() {
    let app = create_test_app();

    let response = app
        .server
        .post("/register")
        .multipart(credentials_form("a@x.com", "secret1"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"]["imageUrl"].is_null());
    assert!(body["user"]["id"].is_string());

    let token = body["token"].as_str().unwrap();
    let claims = app.tokens.verify(token).unwrap();
    assert_eq!(claims.email, "a@x.com");
}

#[tokio::test]
async fn test_register_with_image() {
    let app = create_test_app();
    let form = credentials_form("a@x.com", "secret1").add_part(
        "profileImage",
        Part::bytes(vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a])
            .file_name("me.png")
            .mime_type("image/png"),
    );

    let response = app.server.post("/register").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: RegisterResponse = response.json();
    assert_eq!(
        body.user.image_url.as_deref(),
        Some("https://images.test/profile_images/me.png")
    );
    assert_eq!(app.uploader.upload_count(), 1);
    assert_eq!(
        app.users.get("a@x.com").unwrap().image_url,
        body.user.image_url
    );
}

#[tokio::test]
async fn test_register_missing_password() {
    let app = create_test_app();
    let form = MultipartForm::new().add_text("email", "a@x.com");

    let response = app.server.post("/register").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({ "message": "Email and password are required" }));
    assert_eq!(app.users.len(), 0);
}

#[tokio::test]
async fn test_register_rejects_json_body() {
    let app = create_test_app();

    let response = app
        .server
        .post("/register")
        .json(&json!({ "email": "a@x.com", "password": "secret1" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_register_upload_failure_creates_no_user() {
    let app = create_test_app_with(FakeUploader::failing());
    let form = credentials_form("a@x.com", "secret1").add_part(
        "profileImage",
        Part::bytes(vec![1, 2, 3]).file_name("me.png"),
    );

    let response = app.server.post("/register").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({ "message": "Error uploading profile image" }));
    assert_eq!(app.users.len(), 0);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = create_test_app();
    register(&app, "a@x.com", "secret1").await;

    let response = app
        .server
        .post("/register")
        .multipart(credentials_form("a@x.com", "secret2"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({ "message": "Internal server error" }));
    assert_eq!(app.users.len(), 1);
}

// ============================================================================
// POST /login
// ============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let app = create_test_app();
    register(&app, "a@x.com", "secret1").await;

    let response = app
        .server
        .post("/login")
        .json(&json!({ "email": "a@x.com", "password": "secret1" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: LoginResponse = response.json();
    let claims = app.tokens.verify(&body.token).unwrap();
    assert_eq!(claims.email, "a@x.com");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app();
    register(&app, "a@x.com", "secret1").await;

    let response = app
        .server
        .post("/login")
        .json(&json!({ "email": "a@x.com", "password": "wrong" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({ "message": "Invalid email or password" }));
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = create_test_app();

    let response = app
        .server
        .post("/login")
        .json(&json!({ "email": "nobody@x.com", "password": "secret1" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({ "message": "Invalid email or password" }));
}

#[tokio::test]
async fn test_login_missing_fields() {
    let app = create_test_app();

    let response = app
        .server
        .post("/login")
        .json(&json!({ "email": "a@x.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({ "message": "Email and password are required" }));
}

#[tokio::test]
async fn test_login_unparsable_body() {
    let app = create_test_app();

    let response = app.server.post("/login").text("not json").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// GET /profile
// ============================================================================

#[tokio::test]
async fn test_profile_with_valid_token() {
    let app = create_test_app();
    let registered = register(&app, "a@x.com", "secret1").await;

    let response = app
        .server
        .get("/profile")
        .add_header(header::AUTHORIZATION, bearer(&registered.token))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body,
        json!({ "user": { "id": registered.user.id, "email": "a@x.com" } })
    );
}

#[tokio::test]
async fn test_profile_without_token() {
    let app = create_test_app();

    let response = app.server.get("/profile").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({ "message": "Invalid token" }));
}

#[tokio::test]
async fn test_profile_with_tampered_token() {
    let app = create_test_app();
    let registered = register(&app, "a@x.com", "secret1").await;

    // Splice another identity's payload under the original signature
    let forged = app.tokens.issue(uuid::Uuid::new_v4(), "admin@x.com").unwrap();
    let original: Vec<&str> = registered.token.split('.').collect();
    let forged_payload = forged.split('.').nth(1).unwrap();
    let tampered = format!("{}.{}.{}", original[0], forged_payload, original[2]);

    let response = app
        .server
        .get("/profile")
        .add_header(header::AUTHORIZATION, bearer(&tampered))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({ "message": "Invalid token" }));
}

#[tokio::test]
async fn test_profile_for_deleted_user() {
    let app = create_test_app();
    let registered = register(&app, "a@x.com", "secret1").await;
    app.users.delete(registered.user.id);

    let response = app
        .server
        .get("/profile")
        .add_header(header::AUTHORIZATION, bearer(&registered.token))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({ "message": "User not found" }));
}

// ============================================================================
// OpenAPI
// ============================================================================

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = create_test_app();

    let response = app.server.get("/api-docs/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    for path in ["/", "/register", "/login", "/profile"] {
        assert!(body["paths"].get(path).is_some(), "missing {}", path);
    }
}
