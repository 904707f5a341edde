use crate::Result as DbErrorResult;

use cm_core::{DbmsMap, PolicySettings};

use chrono::Utc;
use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const POLICY_KEY: &str = "policy";
const DBMS_MAP_KEY: &str = "dbms_map";
const REPOSITORY_ID_KEY: &str = "repository_id";

/// Single global records: import policy, DBMS map and repository identity.
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_policy(&self) -> DbErrorResult<PolicySettings> {
        Ok(self.get_json(POLICY_KEY).await?.unwrap_or_default())
    }

    pub async fn save_policy(&self, policy: &PolicySettings) -> DbErrorResult<()> {
        self.put_json(POLICY_KEY, policy).await
    }

    pub async fn get_dbms_map(&self) -> DbErrorResult<DbmsMap> {
        Ok(self.get_json(DBMS_MAP_KEY).await?.unwrap_or_default())
    }

    pub async fn save_dbms_map(&self, map: &DbmsMap) -> DbErrorResult<()> {
        self.put_json(DBMS_MAP_KEY, map).await
    }

    pub async fn get_repository_id(&self) -> DbErrorResult<Option<String>> {
        self.get_json(REPOSITORY_ID_KEY).await
    }

    /// Stored repository id, generating and persisting one on first use.
    pub async fn ensure_repository_id(&self) -> DbErrorResult<String> {
        if let Some(id) = self.get_repository_id().await? {
            return Ok(id);
        }

        let id = Uuid::new_v4().to_string();
        self.put_json(REPOSITORY_ID_KEY, &id).await?;
        info!("Generated repository id {}", id);

        Ok(id)
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbErrorResult<Option<T>> {
        let row = sqlx::query("SELECT value_json FROM cm_settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let json: String = row.try_get("value_json")?;
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    async fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> DbErrorResult<()> {
        let value_json = serde_json::to_string(value)?;
        let updated_at = Utc::now().timestamp();

        sqlx::query(
            r#"
              INSERT INTO cm_settings (key, value_json, updated_at)
              VALUES (?, ?, ?)
              ON CONFLICT(key) DO UPDATE SET
                  value_json = excluded.value_json,
                  updated_at = excluded.updated_at
              "#,
        )
        .bind(key)
        .bind(&value_json)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
