use crate::{DbError, Result as DbErrorResult};

use cm_core::{ErrorLocation, IdentityMap};

use std::panic::Location;

use chrono::Utc;
use log::debug;
use sqlx::{Row, SqlitePool};

/// Persistence of identity maps, one logical map per source server.
///
/// Callers always receive owned snapshots; the only way to change a stored
/// map is to save a whole new one.
pub struct IdMapRepository {
    pool: SqlitePool,
}

impl IdMapRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stored map for `source_server`, or an empty one if none exists.
    ///
    /// More than one stored row is corruption and is reported, never repaired.
    pub async fn get_id_map(&self, source_server: &str) -> DbErrorResult<IdentityMap> {
        let rows = sqlx::query("SELECT map_json FROM cm_id_maps WHERE source_server = ?")
            .bind(source_server)
            .fetch_all(&self.pool)
            .await?;

        match rows.as_slice() {
            [] => Ok(IdentityMap::new(source_server)),
            [row] => {
                let json: String = row.try_get("map_json")?;
                let map: IdentityMap = serde_json::from_str(&json)?;
                Ok(map)
            }
            rows => Err(DbError::DuplicateIdMap {
                source_server: source_server.to_string(),
                count: rows.len() as i64,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Replace the stored map for `map.source_server`.
    ///
    /// Every mapping is validated before anything is written.
    pub async fn save_id_map(&self, map: &IdentityMap) -> DbErrorResult<()> {
        map.validate()?;

        let map_json = serde_json::to_string(map)?;
        let updated_at = Utc::now().timestamp();

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cm_id_maps WHERE source_server = ?")
            .bind(&map.source_server)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
              INSERT INTO cm_id_maps (source_server, map_json, updated_at)
              VALUES (?, ?, ?)
              "#,
        )
        .bind(&map.source_server)
        .bind(&map_json)
        .bind(updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            "Saved identity map for {} ({} mappings)",
            map.source_server,
            map.len()
        );

        Ok(())
    }

    pub async fn list_source_servers(&self) -> DbErrorResult<Vec<String>> {
        let servers = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT source_server FROM cm_id_maps ORDER BY source_server",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(servers)
    }
}
