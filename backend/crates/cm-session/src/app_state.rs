use crate::{RequestRegistry, SessionLock, SessionRegistry};

use cm_auth::Authenticator;
use cm_engine::{EngineContext, JobRegistry};

use std::sync::Arc;
use std::time::Duration;

/// Shared state behind the migration endpoint
#[derive(Clone)]
pub struct AppState {
    pub engine: EngineContext,
    pub jobs: JobRegistry,
    pub lock: Arc<SessionLock>,
    pub sessions: SessionRegistry,
    pub requests: Arc<RequestRegistry>,
    pub authenticator: Authenticator,
}

impl AppState {
    pub fn new(engine: EngineContext, authenticator: Authenticator, lock_hold: Duration) -> Self {
        let jobs = JobRegistry::new(engine.metrics.clone());
        Self {
            engine,
            jobs,
            lock: Arc::new(SessionLock::new(lock_hold)),
            sessions: SessionRegistry::new(),
            requests: Arc::new(RequestRegistry::new()),
            authenticator,
        }
    }
}
