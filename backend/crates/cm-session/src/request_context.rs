use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use uuid::Uuid;

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Request context for correlation and tracing
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique correlation ID for this request
    pub correlation_id: String,
    /// Sequence number within this server instance
    pub request_seq: u64,
    /// User making the request, once known
    pub user: String,
    /// Session the request runs in, empty for `connect`
    pub session_id: String,
    /// Start time for latency tracking
    pub started_at: Instant,
}

impl RequestContext {
    pub fn new(user: impl Into<String>, session_id: impl Into<String>) -> Self {
        let request_seq = REQUEST_COUNTER.fetch_add(1, Ordering::SeqCst);

        Self {
            correlation_id: format!("req-{}-{}", request_seq, Uuid::new_v4().as_simple()),
            request_seq,
            user: user.into(),
            session_id: session_id.into(),
            started_at: Instant::now(),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>, session_id: impl Into<String>) -> Self {
        self.user = user.into();
        self.session_id = session_id.into();
        self
    }

    /// Get elapsed time since request started
    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    /// Create a log prefix for structured logging
    pub fn log_prefix(&self) -> String {
        let user = if self.user.is_empty() { "-" } else { &self.user };
        let session = if self.session_id.is_empty() {
            "-"
        } else {
            &self.session_id[..8.min(self.session_id.len())]
        };
        format!("[req={} user={} session={}]", self.request_seq, user, session)
    }
}
