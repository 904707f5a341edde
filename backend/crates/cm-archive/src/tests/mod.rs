mod compatibility;
mod listing;

use cm_core::{ARCHIVE_FORMAT_VERSION, ArchiveInfo, Dependency, DependencyKind};

use chrono::Utc;

pub(crate) fn create_test_info(name: &str) -> ArchiveInfo {
    ArchiveInfo {
        source_server: "source.example".to_string(),
        created_by: "alice".to_string(),
        created_at: Utc::now(),
        format_version: ARCHIVE_FORMAT_VERSION,
        server_version: "1.0.0".to_string(),
        server_build: "100".to_string(),
        repository_id: "repo-a".to_string(),
        descriptor_name: name.to_string(),
        complete: true,
    }
}

pub(crate) fn create_dependency(object_type: &str, id: &str) -> Dependency {
    Dependency::new(object_type, id, format!("{} {}", object_type, id), DependencyKind::Object)
}
