use crate::{DbError, Result as DbErrorResult};

use cm_core::{DependencyKey, ImportLogEntry, ImportLogStatus, TransactionLogEntry, TransactionStatus};

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub struct ImportLogRepository {
    pool: SqlitePool,
}

impl ImportLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_entry(&self, entry: &ImportLogEntry) -> DbErrorResult<()> {
        sqlx::query(
            r#"
              INSERT INTO cm_import_log (
                  id, run_id, archive_ref, package_key, status, message, started_at, finished_at
              ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
              "#,
        )
        .bind(&entry.id)
        .bind(&entry.run_id)
        .bind(&entry.archive_ref)
        .bind(entry.package_key.as_str())
        .bind(entry.status.as_str())
        .bind(&entry.message)
        .bind(entry.started_at.timestamp_millis())
        .bind(entry.finished_at.map(|dt| dt.timestamp_millis()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record the terminal status of an entry.
    pub async fn finish_entry(
        &self,
        id: &str,
        status: ImportLogStatus,
        message: Option<&str>,
    ) -> DbErrorResult<()> {
        let finished_at = Utc::now().timestamp_millis();

        sqlx::query(
            r#"
              UPDATE cm_import_log
              SET status = ?, message = ?, finished_at = ?
              WHERE id = ?
              "#,
        )
        .bind(status.as_str())
        .bind(message)
        .bind(finished_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn record_transaction(&self, transaction: &TransactionLogEntry) -> DbErrorResult<()> {
        sqlx::query(
            r#"
              INSERT INTO cm_transaction_log (entry_id, object_key, status, message, recorded_at)
              VALUES (?, ?, ?, ?, ?)
              "#,
        )
        .bind(&transaction.entry_id)
        .bind(transaction.object_key.as_str())
        .bind(transaction.status.as_str())
        .bind(&transaction.message)
        .bind(transaction.recorded_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Entries of one import run, in the order packages were processed.
    pub async fn find_by_run(&self, run_id: &str) -> DbErrorResult<Vec<ImportLogEntry>> {
        let rows = sqlx::query(
            r#"
              SELECT id, run_id, archive_ref, package_key, status, message, started_at, finished_at
              FROM cm_import_log
              WHERE run_id = ?
              ORDER BY started_at ASC, rowid ASC
              "#,
        )
        .bind(run_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(entry_from_row).collect()
    }

    pub async fn find_transactions(&self, entry_id: &str) -> DbErrorResult<Vec<TransactionLogEntry>> {
        let rows = sqlx::query(
            r#"
              SELECT entry_id, object_key, status, message, recorded_at
              FROM cm_transaction_log
              WHERE entry_id = ?
              ORDER BY id ASC
              "#,
        )
        .bind(entry_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(transaction_from_row).collect()
    }
}

fn entry_from_row(row: &SqliteRow) -> DbErrorResult<ImportLogEntry> {
    let package_key: String = row.try_get("package_key")?;
    let status: String = row.try_get("status")?;
    let started_at: i64 = row.try_get("started_at")?;
    let finished_at: Option<i64> = row.try_get("finished_at")?;

    Ok(ImportLogEntry {
        id: row.try_get("id")?,
        run_id: row.try_get("run_id")?,
        archive_ref: row.try_get("archive_ref")?,
        package_key: DependencyKey::parse(&package_key)?,
        status: ImportLogStatus::from_str(&status)?,
        message: row.try_get("message")?,
        started_at: timestamp("cm_import_log", started_at)?,
        finished_at: finished_at
            .map(|ms| timestamp("cm_import_log", ms))
            .transpose()?,
    })
}

fn transaction_from_row(row: &SqliteRow) -> DbErrorResult<TransactionLogEntry> {
    let object_key: String = row.try_get("object_key")?;
    let status: String = row.try_get("status")?;
    let recorded_at: i64 = row.try_get("recorded_at")?;

    Ok(TransactionLogEntry {
        entry_id: row.try_get("entry_id")?,
        object_key: DependencyKey::parse(&object_key)?,
        status: TransactionStatus::from_str(&status)?,
        message: row.try_get("message")?,
        recorded_at: timestamp("cm_transaction_log", recorded_at)?,
    })
}

#[track_caller]
fn timestamp(table: &'static str, millis: i64) -> DbErrorResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| DbError::corrupt_row(table, format!("timestamp out of range: {}", millis)))
}
