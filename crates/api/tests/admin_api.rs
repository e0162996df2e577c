//! HTTP-level integration tests for the static fileserver and admin endpoints.

mod common;

use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use chirpy_api::config::Platform;
use chirpy_db::UserStore;
use common::{body_text, get, post_json, send, signed_in_user, TestApp, INDEX_HTML};
use serde_json::json;

async fn post_reset(app: &TestApp) -> axum::http::Response<axum::body::Body> {
    send(app.router(), Method::POST, "/admin/reset", None, None).await
}

/// Static files are served from the configured root.
#[tokio::test]
async fn test_fileserver_serves_index() {
    let app = TestApp::new();

    let response = get(app.router(), "/app/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, INDEX_HTML);

    let response = get(app.router(), "/app/missing.txt").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Every fileserver request is counted and shown on the metrics page.
#[tokio::test]
async fn test_metrics_counts_fileserver_hits() {
    let app = TestApp::new();

    for _ in 0..3 {
        get(app.router(), "/app/index.html").await;
    }
    // API traffic is not counted.
    get(app.router(), "/api/chirps").await;

    assert_eq!(app.state.fileserver_hits(), 3);

    let response = get(app.router(), "/admin/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let html = body_text(response).await;
    assert!(html.contains("Welcome, Chirpy Admin"));
    assert!(html.contains("Chirpy has been visited 3 times!"));
}

/// Reset wipes users and the hit counter on the dev platform.
#[tokio::test]
async fn test_reset_in_dev() {
    let app = TestApp::new();
    let (_, token, _) = signed_in_user(&app, "a@b.com").await;
    common::post_json_auth(app.router(), "/api/chirps", json!({ "body": "hi" }), &token).await;
    get(app.router(), "/app/").await;

    let response = post_reset(&app).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "Hits reset to 0 and database reset to initial state."
    );

    assert_eq!(app.state.fileserver_hits(), 0);
    assert!(app.store.find_user_by_email("a@b.com").await.unwrap().is_none());

    // The email is free again.
    let response = post_json(
        app.router(),
        "/api/users",
        json!({ "email": "a@b.com", "password": "secret123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Reset is forbidden outside the dev platform and changes nothing.
#[tokio::test]
async fn test_reset_forbidden_in_production() {
    let app = TestApp::with_platform(Platform::Production);
    signed_in_user(&app, "a@b.com").await;

    let response = post_reset(&app).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert!(app.store.find_user_by_email("a@b.com").await.unwrap().is_some());
}
