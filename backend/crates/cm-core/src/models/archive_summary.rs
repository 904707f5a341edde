use crate::{ArchiveInfo, DependencyKey};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivePackageSummary {
    pub key: DependencyKey,
    pub name: String,
    pub object_count: usize,
}

/// Metadata plus package overview, without per-object detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveSummary {
    pub archive_ref: String,
    pub info: ArchiveInfo,
    pub packages: Vec<ArchivePackageSummary>,
    pub object_count: usize,
}
