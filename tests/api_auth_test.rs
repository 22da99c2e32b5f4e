use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

use jobhub_backend::config::{Config, CONFIG};
use jobhub_backend::database::pool::lazy_pool;
use jobhub_backend::{build_router, AppState};

// The pool never connects; these tests cover the surface that rejects a
// request before any query runs.
fn test_app() -> Router {
    CONFIG.get_or_init(|| Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url: "postgres://postgres@127.0.0.1:1/jobhub_test".to_string(),
        jwt_secret: "test_secret_key".to_string(),
        environment: "test".to_string(),
        public_rps: 1000,
        api_rps: 1000,
        admin_external_ids: vec!["admin-ext".to_string()],
        client_origin: None,
    });
    let pool = lazy_pool(&CONFIG.get().unwrap().database_url).expect("lazy pool");
    build_router(AppState::new(pool))
}

async fn body_json(response: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_running() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn authed_route_without_token_is_unauthorized() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/comments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"content":"hi","jobId":"00000000-0000-0000-0000-000000000000"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Authentication required"));
}

#[tokio::test]
async fn authed_route_with_garbage_token_is_unauthorized() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/applications/my-applications")
                .header(header::AUTHORIZATION, "Bearer not.a.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], json!("Invalid or expired token"));
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let app = test_app();
    let claims = json!({
        "sub": "user-ext",
        "exp": chrono::Utc::now().timestamp() - 3600,
        "name": "Expired",
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test_secret_key"),
    )
    .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/profile")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_route_without_token_is_unauthorized() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/categories")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"Engineering"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_job_id_is_rejected_before_lookup() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/jobs/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Invalid id format"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
