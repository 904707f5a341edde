use crate::{DependencyKey, TransactionStatus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of installing one object inside a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLogEntry {
    /// Owning import log entry
    pub entry_id: String,
    pub object_key: DependencyKey,
    pub status: TransactionStatus,
    pub message: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
