use crate::{
    EngineError, JobKind, JobMetrics, JobOutcome, JobProgress, JobState, JobStatus,
    Result as EngineErrorResult,
};

use cm_core::ErrorLocation;

use std::collections::HashMap;
use std::future::Future;
use std::panic::Location;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, error, info};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// How long a finished job stays queryable.
pub const DEFAULT_JOB_RETENTION: Duration = Duration::from_secs(60 * 60);

struct JobEntry {
    progress: JobProgress,
    cancel: CancellationToken,
}

/// Background jobs by id, with their status and cancellation handle.
#[derive(Clone)]
pub struct JobRegistry {
    jobs: Arc<Mutex<HashMap<String, JobEntry>>>,
    metrics: JobMetrics,
    retention: Duration,
}

impl JobRegistry {
    pub fn new(metrics: JobMetrics) -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::new())),
            metrics,
            retention: DEFAULT_JOB_RETENTION,
        }
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Run `job` as a background task and return its id.
    ///
    /// The job body decides between `Completed` and `Cancelled`; an error
    /// marks the job `Failed` with the error message.
    pub fn spawn<F, Fut>(&self, kind: JobKind, started_by: &str, job: F) -> String
    where
        F: FnOnce(JobProgress, CancellationToken) -> Fut,
        Fut: Future<Output = EngineErrorResult<JobOutcome>> + Send + 'static,
    {
        let job_id = Uuid::new_v4().to_string();
        let progress = JobProgress::new(JobStatus::new(job_id.clone(), kind, started_by));
        let cancel = CancellationToken::new();

        self.prune();
        self.lock().insert(
            job_id.clone(),
            JobEntry {
                progress: progress.clone(),
                cancel: cancel.clone(),
            },
        );

        let body = job(progress.clone(), cancel);
        let metrics = self.metrics.clone();
        let id = job_id.clone();

        metrics.job_started(kind);
        info!("Job {id} ({}) started by {started_by}", kind.as_str());

        tokio::spawn(async move {
            let started = Instant::now();
            match body.await {
                Ok(JobOutcome { state, result }) => {
                    progress.finish(state, result);
                    if state == JobState::Cancelled {
                        metrics.job_cancelled(kind);
                        info!("Job {id} cancelled");
                    } else {
                        metrics.job_completed(kind, started.elapsed());
                        info!("Job {id} completed in {:?}", started.elapsed());
                    }
                }
                Err(e) => {
                    error!("Job {id} failed: {e}");
                    progress.fail(e.to_string());
                    metrics.job_failed(kind);
                }
            }
        });

        job_id
    }

    pub fn status(&self, job_id: &str) -> EngineErrorResult<JobStatus> {
        self.lock()
            .get(job_id)
            .map(|entry| entry.progress.snapshot())
            .ok_or_else(|| job_not_found(job_id))
    }

    /// Signal cancellation. Returns `false` if the job already finished.
    pub fn cancel(&self, job_id: &str) -> EngineErrorResult<bool> {
        let jobs = self.lock();
        let entry = jobs.get(job_id).ok_or_else(|| job_not_found(job_id))?;

        if entry.progress.snapshot().state.is_terminal() {
            return Ok(false);
        }
        entry.cancel.cancel();
        info!("Job {job_id} cancellation requested");
        Ok(true)
    }

    /// Every retained job with its current status, oldest first.
    pub fn list(&self) -> Vec<JobStatus> {
        self.prune();
        let mut statuses: Vec<JobStatus> = self
            .lock()
            .values()
            .map(|entry| entry.progress.snapshot())
            .collect();
        statuses.sort_by_key(|status| status.started_at);
        statuses
    }

    /// Forget finished jobs older than the retention period.
    ///
    /// Returns the number of jobs removed.
    pub fn prune(&self) -> usize {
        let Ok(retention) = chrono::Duration::from_std(self.retention) else {
            return 0;
        };
        let cutoff = Utc::now() - retention;

        let mut jobs = self.lock();
        let before = jobs.len();
        jobs.retain(|_, entry| {
            let status = entry.progress.snapshot();
            !(status.state.is_terminal()
                && status.finished_at.is_some_and(|finished| finished <= cutoff))
        });
        let removed = before - jobs.len();
        if removed > 0 {
            debug!("Pruned {removed} finished jobs");
        }
        removed
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, JobEntry>> {
        self.jobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new(JobMetrics::new())
    }
}

#[track_caller]
fn job_not_found(job_id: &str) -> EngineError {
    EngineError::JobNotFound {
        job_id: job_id.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
