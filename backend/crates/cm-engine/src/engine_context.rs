use crate::{JobMetrics, PublisherLock, ServerIdentity};

use cm_core::ObjectModel;

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

/// Everything a migration job needs, shared across jobs.
#[derive(Clone)]
pub struct EngineContext {
    pub pool: SqlitePool,
    pub model: Arc<dyn ObjectModel>,
    pub archive_dir: PathBuf,
    pub identity: ServerIdentity,
    pub publisher_lock: PublisherLock,
    pub metrics: JobMetrics,
}

impl EngineContext {
    pub fn new(
        pool: SqlitePool,
        model: Arc<dyn ObjectModel>,
        archive_dir: impl Into<PathBuf>,
        identity: ServerIdentity,
    ) -> Self {
        Self {
            pool,
            model,
            archive_dir: archive_dir.into(),
            identity,
            publisher_lock: PublisherLock::new(),
            metrics: JobMetrics::new(),
        }
    }
}
