//! Integration tests for health checks and request middleware.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    create_test_app, create_test_pool, get_request, parse_response_body, run_migrations, send,
    test_config,
};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check_reports_database() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let (status, body) = send(&app, get_request("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["connected"], true);
    assert_eq!(body["region"], "Surabaya");
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn test_live_and_ready() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let (status, body) = send(&app, get_request("/api/health/live")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");

    let (status, body) = send(&app, get_request("/api/health/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let request = Request::builder()
        .uri("/api/health/live")
        .header("X-Request-ID", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "req-123"
    );
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let response = app.clone().oneshot(get_request("/api/health/live")).await.unwrap();

    let id = response
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/nothing-here"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(parse_response_body(response).await, serde_json::Value::Null);
}
