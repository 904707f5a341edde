mod common;

use crate::common::{body_json, create_test_app_state};

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use googletest::prelude::*;
use serde_json::json;
use tower::ServiceExt;

use cm_server::build_router;

#[tokio::test]
async fn given_running_server_when_health_then_database_operational() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(create_test_app_state(dir.path()).await);
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    // When
    let response = app.oneshot(request).await.unwrap();

    // Then
    assert_that!(response.status(), eq(StatusCode::OK));
    let json = body_json(response).await;
    assert_that!(json["status"], eq(&json!("healthy")));
    assert_that!(json["components"]["database"], eq(&json!("operational")));
    assert_that!(json["sessions"], eq(&json!(0)));
}

#[tokio::test]
async fn given_running_server_when_live_then_ok() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let app = build_router(create_test_app_state(dir.path()).await);
    let request = Request::builder()
        .method("GET")
        .uri("/live")
        .body(Body::empty())
        .unwrap();

    // When
    let response = app.oneshot(request).await.unwrap();

    // Then
    assert_that!(response.status(), eq(StatusCode::OK));
}
