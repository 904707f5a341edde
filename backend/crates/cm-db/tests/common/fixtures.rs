use cm_core::{
    ArchiveDetail, DependencyKey, DependencyKind, DependencyRef, ImportLogEntry, ImportLogStatus,
};
use cm_db::CatalogObject;

use chrono::Utc;
use uuid::Uuid;

pub fn create_test_object(object_type: &str, id: &str, kind: DependencyKind) -> CatalogObject {
    CatalogObject::new(
        object_type,
        id,
        format!("{} {}", object_type, id),
        kind,
        format!("{{\"body\":\"{}\"}}", id),
    )
}

pub fn create_test_detail(object: &CatalogObject, package: &DependencyKey, sequence: u32) -> ArchiveDetail {
    ArchiveDetail {
        key: object.key(),
        object_type: object.object_type.clone(),
        id: object.object_id.clone(),
        name: object.name.clone(),
        kind: object.kind,
        package: package.clone(),
        ancestors: object.ancestors.clone(),
        entry: format!("objects/{}/{}.json", object.object_type, object.object_id),
        sequence,
    }
}

pub fn create_test_log_entry(run_id: &str, package: &str) -> ImportLogEntry {
    ImportLogEntry {
        id: Uuid::new_v4().to_string(),
        run_id: run_id.to_string(),
        archive_ref: "release.zip".to_string(),
        package_key: DependencyRef::new("site", package).key(),
        status: ImportLogStatus::Running,
        message: None,
        started_at: Utc::now(),
        finished_at: None,
    }
}
