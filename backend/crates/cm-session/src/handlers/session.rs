use crate::session_lock::remaining_secs;
use crate::{AppState, HandlerContext, RequestContext, Result as SessionErrorResult};

use log::{info, warn};
use serde_json::{Value, json};

/// Authenticate, open a session and take the advisory lock.
///
/// The new session is discarded again when the lock cannot be taken. A
/// session displaced by `overrideLock` is dropped.
pub fn handle_connect(
    credentials: Option<&str>,
    override_lock: bool,
    state: &AppState,
    request_ctx: &mut RequestContext,
) -> SessionErrorResult<Value> {
    let user = state.authenticator.authenticate(credentials)?;
    let session = state.sessions.register(&user.user);
    *request_ctx = request_ctx.clone().with_user(&session.user, &session.id);

    match state.lock.acquire(&session.id, &session.user, override_lock) {
        Ok(Some(displaced)) => {
            if let Some(old) = state.sessions.remove(&displaced) {
                info!(
                    "{} Dropped session {} of {} after lock override",
                    request_ctx.log_prefix(),
                    old.id,
                    old.user
                );
            }
        }
        Ok(None) => {}
        Err(e) => {
            state.sessions.remove(&session.id);
            warn!("{} Connect refused: {e}", request_ctx.log_prefix());
            return Err(e);
        }
    }

    info!("{} Connected", request_ctx.log_prefix());
    Ok(json!({
        "sessionId": session.id,
        "user": session.user,
        "lockExpiresInSecs": state.lock.hold().as_secs(),
    }))
}

/// End the session, releasing the lock if it holds it.
pub fn handle_disconnect(ctx: &HandlerContext) -> SessionErrorResult<Value> {
    let holder = ctx.state.lock.release(&ctx.session.id);
    ctx.state.sessions.remove(&ctx.session.id);

    info!("{} Disconnected", ctx.log_prefix());
    Ok(json!({
        "released": holder.is_none(),
        "holder": holder,
    }))
}

pub fn handle_extend_lock(ctx: &HandlerContext) -> SessionErrorResult<Value> {
    let hold = ctx.state.lock.extend(&ctx.session.id)?;
    Ok(json!({ "remainingSecs": remaining_secs(hold) }))
}
