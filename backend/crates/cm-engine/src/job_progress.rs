use crate::{JobState, JobStatus};

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

/// Shared, cheaply cloned handle to one job's status.
#[derive(Clone)]
pub struct JobProgress {
    status: Arc<Mutex<JobStatus>>,
}

impl JobProgress {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status: Arc::new(Mutex::new(status)),
        }
    }

    /// Standalone handle for running a job body outside the registry.
    pub fn detached(kind: crate::JobKind) -> Self {
        Self::new(JobStatus::new("detached", kind, "system"))
    }

    pub fn set_state(&self, state: JobState) {
        self.lock().state = state;
    }

    pub fn report(&self, percent: u8, message: impl Into<String>) {
        let mut status = self.lock();
        status.percent = percent.min(100);
        status.message = Some(message.into());
    }

    pub fn finish(&self, state: JobState, result: serde_json::Value) {
        let mut status = self.lock();
        status.state = state;
        if state == JobState::Completed {
            status.percent = 100;
        }
        status.result = Some(result);
        status.finished_at = Some(Utc::now());
    }

    pub fn fail(&self, error: impl Into<String>) {
        let mut status = self.lock();
        status.state = JobState::Failed;
        status.error = Some(error.into());
        status.finished_at = Some(Utc::now());
    }

    pub fn snapshot(&self) -> JobStatus {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, JobStatus> {
        // A panicked writer leaves a usable status behind.
        self.status.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Percentage of `done` out of `total`, for progress reports.
pub(crate) fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((done * 100) / total).min(100) as u8
}
