use crate::JobKind;

use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Metrics for background migration jobs
#[derive(Clone)]
pub struct JobMetrics {
    prefix: &'static str,
}

impl JobMetrics {
    pub fn new() -> Self {
        Self { prefix: "cm_engine" }
    }

    pub fn job_started(&self, kind: JobKind) {
        counter!(format!("{}.jobs.started.{}", self.prefix, kind.as_str())).increment(1);
        gauge!(format!("{}.jobs.active", self.prefix)).increment(1.0);
    }

    pub fn job_completed(&self, kind: JobKind, duration: Duration) {
        counter!(format!("{}.jobs.completed.{}", self.prefix, kind.as_str())).increment(1);
        histogram!(format!("{}.jobs.duration_ms.{}", self.prefix, kind.as_str()))
            .record(duration.as_millis() as f64);
        gauge!(format!("{}.jobs.active", self.prefix)).decrement(1.0);
    }

    pub fn job_cancelled(&self, kind: JobKind) {
        counter!(format!("{}.jobs.cancelled.{}", self.prefix, kind.as_str())).increment(1);
        gauge!(format!("{}.jobs.active", self.prefix)).decrement(1.0);
    }

    pub fn job_failed(&self, kind: JobKind) {
        counter!(format!("{}.jobs.failed.{}", self.prefix, kind.as_str())).increment(1);
        gauge!(format!("{}.jobs.active", self.prefix)).decrement(1.0);
    }

    pub fn objects_exported(&self, count: usize) {
        counter!(format!("{}.objects.exported", self.prefix)).increment(count as u64);
    }

    pub fn objects_installed(&self, count: usize) {
        counter!(format!("{}.objects.installed", self.prefix)).increment(count as u64);
    }
}

impl Default for JobMetrics {
    fn default() -> Self {
        Self::new()
    }
}
