use crate::Result as DbErrorResult;

use cm_core::ValidationResults;

use chrono::Utc;
use sqlx::{Row, SqlitePool};

/// Per-package validation results, keyed by archive reference.
pub struct ValidationResultsRepository {
    pool: SqlitePool,
}

impl ValidationResultsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stored results for an archive; empty if it was never validated.
    pub async fn find(&self, archive_ref: &str) -> DbErrorResult<Vec<ValidationResults>> {
        let row =
            sqlx::query("SELECT results_json FROM cm_validation_results WHERE archive_ref = ?")
                .bind(archive_ref)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => {
                let json: String = row.try_get("results_json")?;
                Ok(serde_json::from_str(&json)?)
            }
            None => Ok(Vec::new()),
        }
    }

    pub async fn save(
        &self,
        archive_ref: &str,
        results: &[ValidationResults],
    ) -> DbErrorResult<()> {
        let results_json = serde_json::to_string(results)?;
        let updated_at = Utc::now().timestamp();

        sqlx::query(
            r#"
              INSERT INTO cm_validation_results (archive_ref, results_json, updated_at)
              VALUES (?, ?, ?)
              ON CONFLICT(archive_ref) DO UPDATE SET
                  results_json = excluded.results_json,
                  updated_at = excluded.updated_at
              "#,
        )
        .bind(archive_ref)
        .bind(&results_json)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Forget stored results, forcing the next validation to run in full.
    pub async fn delete(&self, archive_ref: &str) -> DbErrorResult<bool> {
        let result = sqlx::query("DELETE FROM cm_validation_results WHERE archive_ref = ?")
            .bind(archive_ref)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
