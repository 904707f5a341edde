mod common;

use common::{FakeObjectModel, key, reference};

use cm_core::{ObjectModel, TreeContext};
use cm_engine::{CancellationToken, EngineError, add_missing_dependencies};

use googletest::prelude::*;

async fn root(model: &FakeObjectModel, key_str: &str) -> cm_core::Dependency {
    model.lookup(&reference(key_str)).await.unwrap()
}

#[tokio::test]
async fn given_cycle_when_resolving_then_each_key_included_once() {
    // Given
    let model = FakeObjectModel::new()
        .package("pkg:root", "Root", &["obj:a"])
        .object("obj:a", "A", &["obj:b"])
        .object("obj:b", "B", &["obj:a"]);
    let root = root(&model, "pkg:root").await;
    let mut tree = TreeContext::new();
    tree.add_package(&root.key());

    // When
    let added = add_missing_dependencies(&root, &mut tree, &model, &CancellationToken::new())
        .await
        .unwrap();

    // Then
    assert_that!(added, eq(2));
    assert_that!(tree.included_count(), eq(3));
    assert_that!(tree.is_included(&key("obj:a")), eq(true));
    assert_that!(tree.is_included(&key("obj:b")), eq(true));
}

#[tokio::test]
async fn given_populated_context_when_resolving_again_then_nothing_added() {
    // Given
    let model = FakeObjectModel::new()
        .package("pkg:root", "Root", &["obj:a", "obj:b"])
        .object("obj:a", "A", &["obj:c"])
        .object("obj:b", "B", &[])
        .object("obj:c", "C", &[]);
    let root = root(&model, "pkg:root").await;
    let mut tree = TreeContext::new();
    tree.add_package(&root.key());
    let cancel = CancellationToken::new();
    add_missing_dependencies(&root, &mut tree, &model, &cancel)
        .await
        .unwrap();
    let before = tree.included_count();

    // When
    let added = add_missing_dependencies(&root, &mut tree, &model, &cancel)
        .await
        .unwrap();

    // Then
    assert_that!(added, eq(0));
    assert_that!(tree.included_count(), eq(before));
}

#[tokio::test]
async fn given_nested_children_when_resolving_then_post_order_follows_model_order() {
    // Given
    let model = FakeObjectModel::new()
        .package("pkg:root", "Root", &["obj:a", "obj:b"])
        .object("obj:a", "A", &["obj:c"])
        .object("obj:b", "B", &[])
        .object("obj:c", "C", &[]);
    let root = root(&model, "pkg:root").await;
    let mut tree = TreeContext::new();
    tree.add_package(&root.key());

    // When
    add_missing_dependencies(&root, &mut tree, &model, &CancellationToken::new())
        .await
        .unwrap();

    // Then
    assert_that!(
        tree.package_post_order(&root.key()),
        elements_are![
            eq(&key("obj:c")),
            eq(&key("obj:a")),
            eq(&key("obj:b")),
            eq(&key("pkg:root"))
        ]
    );
}

#[tokio::test]
async fn given_excluded_key_when_resolving_then_suppressed_and_not_expanded() {
    // Given
    let model = FakeObjectModel::new()
        .package("pkg:root", "Root", &["obj:a"])
        .object("obj:a", "A", &["obj:b"])
        .object("obj:b", "B", &[]);
    let root = root(&model, "pkg:root").await;
    let mut tree = TreeContext::with_exclusions([key("obj:a")]);
    tree.add_package(&root.key());

    // When
    let added = add_missing_dependencies(&root, &mut tree, &model, &CancellationToken::new())
        .await
        .unwrap();

    // Then
    assert_that!(added, eq(0));
    assert_that!(tree.is_suppressed(&key("obj:a")), eq(true));
    assert_that!(tree.is_known(&key("obj:b")), eq(false));
}

#[tokio::test]
async fn given_child_with_ancestors_when_resolving_then_ancestors_recorded() {
    // Given
    let model = FakeObjectModel::new()
        .package("pkg:root", "Root", &["obj:a"])
        .object("obj:a", "A", &[])
        .ancestors("obj:a", &["folder:f1"]);
    let root = root(&model, "pkg:root").await;
    let mut tree = TreeContext::new();
    tree.add_package(&root.key());

    // When
    add_missing_dependencies(&root, &mut tree, &model, &CancellationToken::new())
        .await
        .unwrap();

    // Then
    assert_that!(
        tree.missing_ancestors(&key("obj:a")),
        elements_are![eq(&key("folder:f1"))]
    );
}

#[tokio::test]
async fn given_missing_child_when_resolving_then_resolution_error() {
    // Given
    let model = FakeObjectModel::new().package("pkg:root", "Root", &["obj:gone"]);
    let root = root(&model, "pkg:root").await;
    let mut tree = TreeContext::new();
    tree.add_package(&root.key());

    // When
    let result =
        add_missing_dependencies(&root, &mut tree, &model, &CancellationToken::new()).await;

    // Then
    assert!(matches!(result, Err(EngineError::Resolution { .. })));
}

#[tokio::test]
async fn given_cancelled_token_when_resolving_then_cancelled() {
    // Given
    let model = FakeObjectModel::new()
        .package("pkg:root", "Root", &["obj:a"])
        .object("obj:a", "A", &[]);
    let root = root(&model, "pkg:root").await;
    let mut tree = TreeContext::new();
    tree.add_package(&root.key());
    let cancel = CancellationToken::new();
    cancel.cancel();

    // When
    let result = add_missing_dependencies(&root, &mut tree, &model, &cancel).await;

    // Then
    assert!(matches!(result, Err(EngineError::Cancelled { .. })));
    assert_that!(tree.is_known(&key("obj:a")), eq(false));
}
