use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Export,
    Validate,
    Import,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Export => "export",
            Self::Validate => "validate",
            Self::Import => "import",
        }
    }
}

/// Phases of the export, validation and import state machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Init,
    Resolving,
    Packaging,
    Validating,
    Installing,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub job_id: String,
    pub kind: JobKind,
    pub state: JobState,
    pub percent: u8,
    pub message: Option<String>,
    pub error: Option<String>,
    pub result: Option<serde_json::Value>,
    pub started_by: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobStatus {
    pub fn new(job_id: impl Into<String>, kind: JobKind, started_by: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            kind,
            state: JobState::Init,
            percent: 0,
            message: None,
            error: None,
            result: None,
            started_by: started_by.into(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// How a job body ended when it did not fail.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// `Completed` or `Cancelled`
    pub state: JobState,
    pub result: serde_json::Value,
}

impl JobOutcome {
    pub fn completed(result: serde_json::Value) -> Self {
        Self {
            state: JobState::Completed,
            result,
        }
    }

    pub fn cancelled(result: serde_json::Value) -> Self {
        Self {
            state: JobState::Cancelled,
            result,
        }
    }
}
