//! SQLite-backed object model.
//!
//! Objects live in `cm_objects`; the exported payload of an object is its
//! full catalogue record as JSON, so a target catalogue can recreate it.
//! References (children, ancestors) are rewritten through the identity map
//! on install.

use crate::{CatalogObject, DbError, Result as DbErrorResult};

use cm_core::{
    ArchiveDetail, Dependency, DependencyKey, DependencyKind, DependencyRef, ErrorLocation,
    IdentityMap, InstallAction, InstallOutcome, ObjectModel, ObjectModelError, ObjectModelResult,
    ObjectValidation, PolicySettings,
};

use std::panic::Location;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub struct CatalogObjectModel {
    pool: SqlitePool,
}

impl CatalogObjectModel {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace an object.
    pub async fn put(&self, object: &CatalogObject) -> DbErrorResult<()> {
        let children = serde_json::to_string(&object.children)?;
        let ancestors = serde_json::to_string(&object.ancestors)?;
        let updated_at = Utc::now().timestamp();

        sqlx::query(
            r#"
              INSERT INTO cm_objects (
                  object_type, object_id, name, kind, payload, children, ancestors, updated_at
              ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
              ON CONFLICT(object_type, object_id) DO UPDATE SET
                  name = excluded.name,
                  kind = excluded.kind,
                  payload = excluded.payload,
                  children = excluded.children,
                  ancestors = excluded.ancestors,
                  updated_at = excluded.updated_at
              "#,
        )
        .bind(&object.object_type)
        .bind(&object.object_id)
        .bind(&object.name)
        .bind(object.kind.as_str())
        .bind(&object.payload)
        .bind(&children)
        .bind(&ancestors)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, object_type: &str, object_id: &str) -> DbErrorResult<Option<CatalogObject>> {
        let row = sqlx::query(
            r#"
              SELECT object_type, object_id, name, kind, payload, children, ancestors
              FROM cm_objects
              WHERE object_type = ? AND object_id = ?
              "#,
        )
        .bind(object_type)
        .bind(object_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(object_from_row).transpose()
    }

    pub async fn count(&self) -> DbErrorResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cm_objects")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn find(&self, reference: &DependencyRef) -> ObjectModelResult<CatalogObject> {
        self.get(&reference.object_type, &reference.id)
            .await?
            .ok_or_else(|| not_found(reference.key()))
    }
}

#[async_trait]
impl ObjectModel for CatalogObjectModel {
    async fn list_deployable(&self, object_type: &str) -> ObjectModelResult<Vec<Dependency>> {
        let rows = sqlx::query(
            r#"
              SELECT object_type, object_id, name, kind, payload, children, ancestors
              FROM cm_objects
              WHERE object_type = ? AND kind = ?
              ORDER BY name ASC, object_id ASC
              "#,
        )
        .bind(object_type)
        .bind(DependencyKind::DeployableElement.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        rows.iter()
            .map(|row| -> ObjectModelResult<Dependency> {
                Ok(object_from_row(row)?.to_dependency())
            })
            .collect()
    }

    async fn lookup(&self, reference: &DependencyRef) -> ObjectModelResult<Dependency> {
        Ok(self.find(reference).await?.to_dependency())
    }

    async fn ancestors(&self, dependency: &Dependency) -> ObjectModelResult<Vec<DependencyRef>> {
        Ok(self.find(&dependency.to_ref()).await?.ancestors)
    }

    async fn serialize(&self, dependency: &Dependency) -> ObjectModelResult<Vec<u8>> {
        let object = self.find(&dependency.to_ref()).await?;
        Ok(serde_json::to_vec(&object).map_err(DbError::from)?)
    }

    async fn exists_on_target(
        &self,
        reference: &DependencyRef,
        id_map: Option<&IdentityMap>,
    ) -> ObjectModelResult<bool> {
        let target_id = mapped_id(&reference.key(), &reference.id, id_map);
        Ok(self
            .get(&reference.object_type, target_id)
            .await?
            .is_some())
    }

    async fn validate(
        &self,
        detail: &ArchiveDetail,
        mapped_target: Option<&str>,
    ) -> ObjectModelResult<ObjectValidation> {
        let target_id = mapped_target.unwrap_or(&detail.id);

        let Some(existing) = self.get(&detail.object_type, target_id).await? else {
            return Ok(ObjectValidation::ok());
        };

        let mut validation = ObjectValidation::ok();
        if existing.kind != detail.kind {
            validation.failures.push(format!(
                "{} exists on target as {} but archive has {}",
                detail.key,
                existing.kind.as_str(),
                detail.kind.as_str()
            ));
        } else if existing.name != detail.name {
            validation.warnings.push(format!(
                "{} is named '{}' on target and '{}' in archive",
                detail.key, existing.name, detail.name
            ));
        }

        Ok(validation)
    }

    async fn install(
        &self,
        detail: &ArchiveDetail,
        payload: &[u8],
        id_map: Option<&IdentityMap>,
        policy: &PolicySettings,
    ) -> ObjectModelResult<InstallOutcome> {
        let source: CatalogObject =
            serde_json::from_slice(payload).map_err(|e| ObjectModelError::Incompatible {
                message: format!("unreadable payload for {}: {}", detail.key, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let target_id = mapped_id(&detail.key, &detail.id, id_map).to_string();
        let exists = self.get(&detail.object_type, &target_id).await?.is_some();

        let action = match (exists, policy.overwrite_existing, policy.create_missing) {
            (true, true, _) => InstallAction::Updated,
            (true, false, _) => InstallAction::Skipped,
            (false, _, true) => InstallAction::Created,
            (false, _, false) => InstallAction::Skipped,
        };

        if action != InstallAction::Skipped {
            let object = CatalogObject {
                object_id: target_id.clone(),
                children: remap_refs(&source.children, id_map),
                ancestors: remap_refs(&source.ancestors, id_map),
                ..source
            };
            self.put(&object).await?;
        }

        debug!("Install {} as {}: {:?}", detail.key, target_id, action);

        Ok(InstallOutcome { target_id, action })
    }

    async fn flush_caches(&self) -> ObjectModelResult<()> {
        // Reads always go to SQLite; nothing is cached.
        Ok(())
    }
}

impl From<DbError> for ObjectModelError {
    #[track_caller]
    fn from(error: DbError) -> Self {
        ObjectModelError::Storage {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

fn mapped_id<'a>(key: &DependencyKey, source_id: &'a str, id_map: Option<&'a IdentityMap>) -> &'a str {
    id_map
        .and_then(|map| map.target_id(key))
        .unwrap_or(source_id)
}

fn remap_refs(refs: &[DependencyRef], id_map: Option<&IdentityMap>) -> Vec<DependencyRef> {
    refs.iter()
        .map(|reference| {
            let id = mapped_id(&reference.key(), &reference.id, id_map);
            DependencyRef::new(reference.object_type.clone(), id.to_string())
        })
        .collect()
}

#[track_caller]
fn not_found(key: DependencyKey) -> ObjectModelError {
    ObjectModelError::NotFound {
        key: key.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

fn object_from_row(row: &SqliteRow) -> DbErrorResult<CatalogObject> {
    let kind: String = row.try_get("kind")?;
    let children: String = row.try_get("children")?;
    let ancestors: String = row.try_get("ancestors")?;

    Ok(CatalogObject {
        object_type: row.try_get("object_type")?,
        object_id: row.try_get("object_id")?,
        name: row.try_get("name")?,
        kind: DependencyKind::from_str(&kind)?,
        payload: row.try_get("payload")?,
        children: serde_json::from_str(&children)?,
        ancestors: serde_json::from_str(&ancestors)?,
    })
}
