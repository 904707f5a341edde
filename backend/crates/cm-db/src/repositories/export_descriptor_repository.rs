use crate::Result as DbErrorResult;

use cm_core::ExportDescriptor;

use chrono::Utc;
use sqlx::{Row, SqlitePool};

pub struct ExportDescriptorRepository {
    pool: SqlitePool,
}

impl ExportDescriptorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_name(&self, name: &str) -> DbErrorResult<Option<ExportDescriptor>> {
        let row = sqlx::query("SELECT descriptor_json FROM cm_export_descriptors WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let json: String = row.try_get("descriptor_json")?;
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    /// Insert or replace a descriptor by name.
    pub async fn save(&self, descriptor: &ExportDescriptor) -> DbErrorResult<()> {
        descriptor.validate()?;

        let descriptor_json = serde_json::to_string(descriptor)?;
        let updated_at = Utc::now().timestamp();

        sqlx::query(
            r#"
              INSERT INTO cm_export_descriptors (name, descriptor_json, updated_at)
              VALUES (?, ?, ?)
              ON CONFLICT(name) DO UPDATE SET
                  descriptor_json = excluded.descriptor_json,
                  updated_at = excluded.updated_at
              "#,
        )
        .bind(&descriptor.name)
        .bind(&descriptor_json)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_names(&self) -> DbErrorResult<Vec<String>> {
        let names =
            sqlx::query_scalar::<_, String>("SELECT name FROM cm_export_descriptors ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(names)
    }

    pub async fn delete(&self, name: &str) -> DbErrorResult<bool> {
        let result = sqlx::query("DELETE FROM cm_export_descriptors WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
