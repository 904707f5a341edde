use cm_auth::Authenticator;
use cm_core::DependencyKind;
use cm_db::{CatalogObject, CatalogObjectModel};
use cm_engine::{EngineContext, ServerIdentity};
use cm_session::{AppState, ErrorDocument, RequestDocument, ResponseDocument, dispatch};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub const REPOSITORY_ID: &str = "repo-test";
pub const LOCK_HOLD: Duration = Duration::from_secs(1800);

/// Creates an in-memory SQLite pool with migrations run
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    cm_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn create_state(pool: &SqlitePool, archive_dir: &Path, lock_hold: Duration) -> AppState {
    let model = Arc::new(CatalogObjectModel::new(pool.clone()));
    let identity = ServerIdentity {
        server_address: "localhost".to_string(),
        server_version: "0.1.0".to_string(),
        server_build: "1".to_string(),
        repository_id: REPOSITORY_ID.to_string(),
    };
    let engine = EngineContext::new(pool.clone(), model, archive_dir, identity);
    AppState::new(engine, Authenticator::disabled("admin"), lock_hold)
}

/// `site:main` with two templates, one of which links a shared stylesheet.
pub async fn seed_catalog(pool: &SqlitePool) {
    let model = CatalogObjectModel::new(pool.clone());
    let objects = [
        CatalogObject::new("site", "main", "Main Site", DependencyKind::DeployableElement, "{}")
            .with_children(vec![
                cm_core::DependencyRef::new("template", "home"),
                cm_core::DependencyRef::new("template", "about"),
            ]),
        CatalogObject::new("template", "home", "Home", DependencyKind::Object, "{}")
            .with_children(vec![cm_core::DependencyRef::new("style", "base")]),
        CatalogObject::new("template", "about", "About", DependencyKind::Object, "{}"),
        CatalogObject::new("style", "base", "Base", DependencyKind::Object, "{}"),
    ];
    for object in &objects {
        model.put(object).await.expect("Failed to seed catalog");
    }
}

pub async fn send(state: &AppState, doc: RequestDocument) -> Result<ResponseDocument, ErrorDocument> {
    dispatch(doc, state).await
}

/// Connect as `user` and return the new session id.
pub async fn connect(state: &AppState, user: &str) -> String {
    let response = send(
        state,
        RequestDocument::new("connect").with_attribute("credentials", user),
    )
    .await
    .expect("connect failed");

    response.body["sessionId"]
        .as_str()
        .expect("session id in connect result")
        .to_string()
}

/// Poll `job-status` until the job reaches a terminal state.
pub async fn wait_for_job(state: &AppState, session_id: &str, job_id: &str) -> Value {
    for _ in 0..200 {
        let response = send(
            state,
            RequestDocument::new("job-status")
                .with_session(session_id)
                .with_attribute("jobId", job_id),
        )
        .await
        .expect("job-status failed");

        let finished = matches!(
            response.body["state"].as_str(),
            Some("completed" | "failed" | "cancelled")
        );
        if finished {
            return response.body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not finish");
}
