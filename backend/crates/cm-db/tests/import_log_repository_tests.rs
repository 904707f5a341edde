mod common;

use common::{create_test_log_entry, create_test_pool};

use cm_core::{DependencyKey, ImportLogStatus, TransactionLogEntry, TransactionStatus};
use cm_db::ImportLogRepository;

use chrono::Utc;
use googletest::prelude::*;

#[tokio::test]
async fn given_running_entry_when_finished_then_status_and_time_recorded() {
    // Given
    let pool = create_test_pool().await;
    let repo = ImportLogRepository::new(pool);
    let entry = create_test_log_entry("run-1", "p1");
    repo.create_entry(&entry).await.unwrap();

    // When
    repo.finish_entry(&entry.id, ImportLogStatus::Completed, None)
        .await
        .unwrap();

    // Then
    let entries = repo.find_by_run("run-1").await.unwrap();
    assert_that!(entries, len(eq(1)));
    assert_that!(entries[0].status, eq(ImportLogStatus::Completed));
    assert_that!(entries[0].finished_at, some(anything()));
}

#[tokio::test]
async fn given_entries_for_two_runs_when_find_by_run_then_only_that_run_in_order() {
    // Given
    let pool = create_test_pool().await;
    let repo = ImportLogRepository::new(pool);
    let first = create_test_log_entry("run-1", "p1");
    let second = create_test_log_entry("run-1", "p2");
    let other = create_test_log_entry("run-2", "p1");
    repo.create_entry(&first).await.unwrap();
    repo.create_entry(&second).await.unwrap();
    repo.create_entry(&other).await.unwrap();

    // When
    let entries = repo.find_by_run("run-1").await.unwrap();

    // Then
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_that!(ids, elements_are![eq(&first.id.as_str()), eq(&second.id.as_str())]);
}

#[tokio::test]
async fn given_transactions_when_find_transactions_then_returned_in_insert_order() {
    // Given
    let pool = create_test_pool().await;
    let repo = ImportLogRepository::new(pool);
    let entry = create_test_log_entry("run-1", "p1");
    repo.create_entry(&entry).await.unwrap();

    for (id, status) in [("a", TransactionStatus::Installed), ("b", TransactionStatus::Failed)] {
        repo.record_transaction(&TransactionLogEntry {
            entry_id: entry.id.clone(),
            object_key: DependencyKey::new("template", id),
            status,
            message: None,
            recorded_at: Utc::now(),
        })
        .await
        .unwrap();
    }

    // When
    let transactions = repo.find_transactions(&entry.id).await.unwrap();

    // Then
    assert_that!(transactions, len(eq(2)));
    assert_that!(transactions[0].object_key.id(), eq("a"));
    assert_that!(transactions[1].status, eq(TransactionStatus::Failed));
}

#[tokio::test]
async fn given_aborted_entry_when_finished_with_message_then_message_kept() {
    // Given
    let pool = create_test_pool().await;
    let repo = ImportLogRepository::new(pool);
    let entry = create_test_log_entry("run-1", "p1");
    repo.create_entry(&entry).await.unwrap();

    // When
    repo.finish_entry(&entry.id, ImportLogStatus::Aborted, Some("validation failed"))
        .await
        .unwrap();

    // Then
    let entries = repo.find_by_run("run-1").await.unwrap();
    assert_that!(entries[0].status, eq(ImportLogStatus::Aborted));
    assert_that!(entries[0].message.as_deref(), some(eq("validation failed")));
}
