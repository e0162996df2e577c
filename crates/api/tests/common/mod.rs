//! Shared helpers for HTTP integration tests.
//!
//! Every test app runs the production router (`build_app_router`) against an
//! in-memory store, with a temporary directory as the static file root.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use chirpy_api::auth::jwt::JwtConfig;
use chirpy_api::config::{Platform, ServerConfig};
use chirpy_api::router::build_app_router;
use chirpy_api::state::AppState;
use chirpy_db::MemoryStore;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";
pub const INDEX_HTML: &str = "<html><body>Welcome to Chirpy</body></html>";

/// A router plus handles on the state behind it.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    /// Kept alive for the lifetime of the app; dropping it deletes the files.
    _static_root: TempDir,
}

impl TestApp {
    /// An app on the `dev` platform with the webhook key configured.
    pub fn new() -> Self {
        Self::with_platform(Platform::Dev)
    }

    pub fn with_platform(platform: Platform) -> Self {
        let static_root = tempfile::tempdir().expect("tempdir should be created");
        std::fs::write(static_root.path().join("index.html"), INDEX_HTML)
            .expect("index.html should be written");

        let config = test_config(platform, static_root.path().to_path_buf());
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config);
        let router = build_app_router(state.clone());

        Self {
            router,
            state,
            store,
            _static_root: static_root,
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(platform: Platform, fileserver_root: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused".to_string(),
        cors_origins: vec!["http://localhost:8080".to_string()],
        request_timeout_secs: 30,
        store_timeout_secs: 5,
        jwt: JwtConfig::new(TEST_JWT_SECRET, 60),
        polka_key: TEST_POLKA_KEY.to_string(),
        platform,
        fileserver_root,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    send(app, Method::POST, uri, Some(&bearer), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    send(app, Method::PUT, uri, Some(&bearer), Some(body)).await
}

/// POST with no body and the given token as bearer.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    send(app, Method::POST, uri, Some(&bearer), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    send(app, Method::DELETE, uri, Some(&bearer), None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}

// ---------------------------------------------------------------------------
// Flow helpers
// ---------------------------------------------------------------------------

/// Register a user through the API and return the response JSON.
pub async fn create_user(app: &TestApp, email: &str, password: &str) -> serde_json::Value {
    let response = post_json(
        app.router(),
        "/api/users",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}

/// Log in through the API and return the response JSON (user + both tokens).
pub async fn login(app: &TestApp, email: &str, password: &str) -> serde_json::Value {
    let response = post_json(
        app.router(),
        "/api/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await
}

/// Register and log in; returns `(user_id, session token, refresh token)`.
pub async fn signed_in_user(app: &TestApp, email: &str) -> (String, String, String) {
    create_user(app, email, "secret123").await;
    let session = login(app, email, "secret123").await;
    (
        session["id"].as_str().unwrap().to_string(),
        session["token"].as_str().unwrap().to_string(),
        session["refresh_token"].as_str().unwrap().to_string(),
    )
}
