mod common;

use common::create_test_pool;

use cm_core::{DependencyKey, DependencyRef, ExportDescriptor};
use cm_db::{DbError, ExportDescriptorRepository};

use googletest::prelude::*;

fn create_descriptor(name: &str) -> ExportDescriptor {
    let mut descriptor = ExportDescriptor::new(
        name,
        vec![DependencyRef::new("site", "p1"), DependencyRef::new("site", "p2")],
    );
    descriptor.exclusions.push(DependencyKey::new("image", "logo"));
    descriptor
}

#[tokio::test]
async fn given_saved_descriptor_when_find_by_name_then_returned() {
    // Given
    let pool = create_test_pool().await;
    let repo = ExportDescriptorRepository::new(pool);
    let descriptor = create_descriptor("release-1");

    // When
    repo.save(&descriptor).await.unwrap();
    let found = repo.find_by_name("release-1").await.unwrap();

    // Then
    assert_that!(found, some(eq(&descriptor)));
}

#[tokio::test]
async fn given_unknown_name_when_find_by_name_then_none() {
    // Given
    let pool = create_test_pool().await;
    let repo = ExportDescriptorRepository::new(pool);

    // When
    let found = repo.find_by_name("missing").await.unwrap();

    // Then
    assert_that!(found, none());
}

#[tokio::test]
async fn given_descriptor_without_packages_when_saved_then_validation_error() {
    // Given
    let pool = create_test_pool().await;
    let repo = ExportDescriptorRepository::new(pool);
    let descriptor = ExportDescriptor::new("empty", Vec::new());

    // When
    let result = repo.save(&descriptor).await;

    // Then
    assert!(matches!(result, Err(DbError::Core { .. })));
    assert_that!(repo.list_names().await.unwrap(), is_empty());
}

#[tokio::test]
async fn given_existing_descriptor_when_saved_again_then_replaced() {
    // Given
    let pool = create_test_pool().await;
    let repo = ExportDescriptorRepository::new(pool);
    repo.save(&create_descriptor("release-1")).await.unwrap();
    let updated = ExportDescriptor::new("release-1", vec![DependencyRef::new("site", "p3")]);

    // When
    repo.save(&updated).await.unwrap();

    // Then
    assert_that!(repo.find_by_name("release-1").await.unwrap(), some(eq(&updated)));
    assert_that!(repo.list_names().await.unwrap(), len(eq(1)));
}

#[tokio::test]
async fn given_saved_descriptor_when_deleted_then_gone() {
    // Given
    let pool = create_test_pool().await;
    let repo = ExportDescriptorRepository::new(pool);
    repo.save(&create_descriptor("release-1")).await.unwrap();

    // When
    let deleted = repo.delete("release-1").await.unwrap();

    // Then
    assert_that!(deleted, eq(true));
    assert_that!(repo.find_by_name("release-1").await.unwrap(), none());
}
