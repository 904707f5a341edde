use crate::{AppState, RequestContext, Session};

/// Context passed to every handler of a session-bound request.
#[derive(Clone)]
pub struct HandlerContext {
    pub state: AppState,
    pub session: Session,
    pub request_ctx: RequestContext,
}

impl HandlerContext {
    pub fn user(&self) -> &str {
        &self.session.user
    }

    pub fn pool(&self) -> sqlx::SqlitePool {
        self.state.engine.pool.clone()
    }

    /// Get log prefix for structured logging
    pub fn log_prefix(&self) -> String {
        self.request_ctx.log_prefix()
    }
}

impl std::fmt::Debug for HandlerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerContext")
            .field("session_id", &self.session.id)
            .field("user", &self.session.user)
            .field("correlation_id", &self.request_ctx.correlation_id)
            .finish()
    }
}
