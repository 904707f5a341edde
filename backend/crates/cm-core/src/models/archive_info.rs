use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Container format written by this version.
pub const ARCHIVE_FORMAT_VERSION: u32 = 1;

/// Archive-level metadata, written once when an export finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveInfo {
    /// Address of the server the archive was exported from
    pub source_server: String,

    /// Administrator that ran the export
    pub created_by: String,

    pub created_at: DateTime<Utc>,

    pub format_version: u32,
    pub server_version: String,
    pub server_build: String,

    /// Identity of the source object repository
    pub repository_id: String,

    pub descriptor_name: String,

    /// False when the export was cancelled before every package was written
    pub complete: bool,
}
