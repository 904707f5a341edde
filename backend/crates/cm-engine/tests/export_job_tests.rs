mod common;

use common::{
    FakeObjectModel, SOURCE_REPOSITORY, create_context, create_test_pool, export, key,
    save_descriptor, shared_object_model,
};

use cm_archive::ArchiveReader;
use cm_core::DependencyKind;
use cm_engine::{CancellationToken, EngineError, ExportJob, JobKind, JobProgress, JobState};

use std::sync::Arc;

use googletest::prelude::*;
use tempfile::TempDir;

#[tokio::test]
async fn given_packages_sharing_object_when_exported_then_shared_object_listed_once() {
    // Given
    let pool = create_test_pool().await;
    let dir = TempDir::new().unwrap();
    let model = Arc::new(shared_object_model());
    let ctx = create_context(&pool, &model, dir.path(), SOURCE_REPOSITORY);
    save_descriptor(&pool, "release", &["pkg:p1", "pkg:p2"]).await;

    // When
    let outcome = export(&ctx, "release").await;

    // Then
    assert_that!(outcome.state, eq(JobState::Completed));
    let reader = ArchiveReader::open(dir.path(), "release").unwrap();
    let manifest = reader.manifest();
    assert_that!(manifest.packages, len(eq(2)));
    assert_that!(
        manifest.packages[0].objects,
        elements_are![eq(&key("obj:shared")), eq(&key("obj:a")), eq(&key("pkg:p1"))]
    );
    assert_that!(
        manifest.packages[1].objects,
        elements_are![eq(&key("obj:b")), eq(&key("pkg:p2"))]
    );
    assert_that!(reader.details().len(), eq(5));
    assert_that!(reader.info().complete, eq(true));
}

#[tokio::test]
async fn given_export_when_finished_then_roots_are_deployable_and_info_stamped() {
    // Given
    let pool = create_test_pool().await;
    let dir = TempDir::new().unwrap();
    let model = Arc::new(shared_object_model());
    let ctx = create_context(&pool, &model, dir.path(), SOURCE_REPOSITORY);
    save_descriptor(&pool, "release", &["pkg:p1"]).await;

    // When
    export(&ctx, "release").await;

    // Then
    let reader = ArchiveReader::open(dir.path(), "release").unwrap();
    let root = reader
        .details()
        .iter()
        .find(|detail| detail.key == key("pkg:p1"))
        .unwrap();
    assert_that!(root.kind, eq(DependencyKind::DeployableElement));
    assert_that!(reader.info().repository_id.as_str(), eq(SOURCE_REPOSITORY));
    assert_that!(reader.info().created_by.as_str(), eq("admin"));
    assert_that!(reader.info().descriptor_name.as_str(), eq("release"));
}

#[tokio::test]
async fn given_unknown_descriptor_when_exported_then_descriptor_not_found() {
    // Given
    let pool = create_test_pool().await;
    let dir = TempDir::new().unwrap();
    let model = Arc::new(FakeObjectModel::new());
    let ctx = create_context(&pool, &model, dir.path(), SOURCE_REPOSITORY);

    // When
    let result = ExportJob::new(ctx, "missing", "admin")
        .run(&JobProgress::detached(JobKind::Export), &CancellationToken::new())
        .await;

    // Then
    assert!(matches!(result, Err(EngineError::DescriptorNotFound { .. })));
}

#[tokio::test]
async fn given_cancel_after_first_package_when_exported_then_archive_incomplete() {
    // Given
    let pool = create_test_pool().await;
    let dir = TempDir::new().unwrap();
    let cancel = CancellationToken::new();
    let model =
        Arc::new(shared_object_model().cancel_after_serializing("pkg:p1", cancel.clone()));
    let ctx = create_context(&pool, &model, dir.path(), SOURCE_REPOSITORY);
    save_descriptor(&pool, "release", &["pkg:p1", "pkg:p2"]).await;

    // When
    let outcome = ExportJob::new(ctx, "release", "admin")
        .run(&JobProgress::detached(JobKind::Export), &cancel)
        .await
        .unwrap();

    // Then
    assert_that!(outcome.state, eq(JobState::Cancelled));
    let reader = ArchiveReader::open(dir.path(), "release").unwrap();
    assert_that!(reader.info().complete, eq(false));
    assert_that!(reader.manifest().packages, len(eq(1)));
}

#[tokio::test]
async fn given_serialize_failure_when_exported_then_no_archive_left_behind() {
    // Given
    let pool = create_test_pool().await;
    let dir = TempDir::new().unwrap();
    let model = Arc::new(shared_object_model().fail_serialize("obj:a"));
    let ctx = create_context(&pool, &model, dir.path(), SOURCE_REPOSITORY);
    save_descriptor(&pool, "release", &["pkg:p1"]).await;

    // When
    let result = ExportJob::new(ctx, "release", "admin")
        .run(&JobProgress::detached(JobKind::Export), &CancellationToken::new())
        .await;

    // Then
    assert!(matches!(result, Err(EngineError::ObjectModel { .. })));
    let remaining = std::fs::read_dir(dir.path()).unwrap().count();
    assert_that!(remaining, eq(0));
}

#[tokio::test]
async fn given_dangling_child_when_exported_then_resolution_error() {
    // Given
    let pool = create_test_pool().await;
    let dir = TempDir::new().unwrap();
    let model = Arc::new(FakeObjectModel::new().package("pkg:p1", "P1", &["obj:gone"]));
    let ctx = create_context(&pool, &model, dir.path(), SOURCE_REPOSITORY);
    save_descriptor(&pool, "release", &["pkg:p1"]).await;

    // When
    let result = ExportJob::new(ctx, "release", "admin")
        .run(&JobProgress::detached(JobKind::Export), &CancellationToken::new())
        .await;

    // Then
    assert!(matches!(result, Err(EngineError::Resolution { .. })));
}
