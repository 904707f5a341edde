use crate::{DependencyKey, ImportLogStatus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-package record of one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportLogEntry {
    pub id: String,

    /// Import run this entry belongs to (the `archiveLogId` clients ask for)
    pub run_id: String,

    pub archive_ref: String,
    pub package_key: DependencyKey,
    pub status: ImportLogStatus,
    pub message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}
