use crate::common::FakeObjectModel;

use cm_core::{DependencyRef, ExportDescriptor};
use cm_db::ExportDescriptorRepository;
use cm_engine::{
    EngineContext, JobKind, JobOutcome, JobProgress, JobRegistry, JobState, JobStatus,
    ServerIdentity,
};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub const SOURCE_REPOSITORY: &str = "repo-source";

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

pub fn create_identity(repository_id: &str) -> ServerIdentity {
    ServerIdentity {
        server_address: "src1".to_string(),
        server_version: "0.1.0".to_string(),
        server_build: "42".to_string(),
        repository_id: repository_id.to_string(),
    }
}

pub fn create_context(
    pool: &SqlitePool,
    model: &Arc<FakeObjectModel>,
    archive_dir: &Path,
    repository_id: &str,
) -> EngineContext {
    EngineContext::new(
        pool.clone(),
        model.clone(),
        archive_dir,
        create_identity(repository_id),
    )
}

/// P1 and P2 both reach `obj:shared`.
pub fn shared_object_model() -> FakeObjectModel {
    FakeObjectModel::new()
        .package("pkg:p1", "Package One", &["obj:shared", "obj:a"])
        .package("pkg:p2", "Package Two", &["obj:shared", "obj:b"])
        .object("obj:shared", "Shared", &[])
        .object("obj:a", "A", &[])
        .object("obj:b", "B", &[])
}

pub async fn save_descriptor(pool: &SqlitePool, name: &str, packages: &[&str]) {
    let descriptor = ExportDescriptor::new(
        name,
        packages
            .iter()
            .map(|p| crate::common::reference(p))
            .collect::<Vec<DependencyRef>>(),
    );
    ExportDescriptorRepository::new(pool.clone())
        .save(&descriptor)
        .await
        .expect("Failed to save descriptor");
}

/// Run an export to completion outside the registry.
pub async fn export(ctx: &EngineContext, name: &str) -> JobOutcome {
    cm_engine::ExportJob::new(ctx.clone(), name, "admin")
        .run(&JobProgress::detached(JobKind::Export), &cm_engine::CancellationToken::new())
        .await
        .expect("export failed")
}

/// Poll until the job leaves its running states.
pub async fn wait_for_job(registry: &JobRegistry, job_id: &str) -> JobStatus {
    for _ in 0..200 {
        let status = registry.status(job_id).expect("job registered");
        if status.state.is_terminal() {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not finish");
}

pub fn is_state(outcome: &JobOutcome, state: JobState) -> bool {
    outcome.state == state
}
