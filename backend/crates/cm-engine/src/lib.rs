pub mod engine_context;
pub mod error;
pub mod job_metrics;
pub mod job_progress;
pub mod job_registry;
pub mod job_status;
pub mod jobs;
pub mod publisher_lock;
pub mod resolver;
pub mod server_identity;

pub use engine_context::EngineContext;
pub use error::{EngineError, Result};
pub use job_metrics::JobMetrics;
pub use job_progress::JobProgress;
pub use job_registry::JobRegistry;
pub use job_status::{JobKind, JobOutcome, JobState, JobStatus};
pub use jobs::export_job::ExportJob;
pub use jobs::import_job::{ImportJob, ImportReport, PackageReport};
pub use jobs::validation_job::ValidationJob;
pub use publisher_lock::PublisherLock;
pub use resolver::add_missing_dependencies;
pub use server_identity::ServerIdentity;

// Re-exported so callers can cancel jobs without a direct dependency
pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod tests;
