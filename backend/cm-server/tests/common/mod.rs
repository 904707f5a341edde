#![allow(dead_code)]

//! Test infrastructure for cm-server route tests

use cm_auth::Authenticator;
use cm_db::CatalogObjectModel;
use cm_engine::{EngineContext, ServerIdentity};
use cm_session::AppState;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Create a test pool with in-memory SQLite
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create test database");

    cm_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Create AppState for testing
pub async fn create_test_app_state(archive_dir: &Path) -> AppState {
    let pool = create_test_pool().await;
    let model = Arc::new(CatalogObjectModel::new(pool.clone()));
    let identity = ServerIdentity {
        server_address: "localhost".to_string(),
        server_version: "0.1.0".to_string(),
        server_build: "1".to_string(),
        repository_id: "repo-test".to_string(),
    };
    let engine = EngineContext::new(pool, model, archive_dir, identity);

    AppState::new(
        engine,
        Authenticator::disabled("test-user"),
        Duration::from_secs(1800),
    )
}

pub fn post_migration(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/migration")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
