use crate::handlers::archives::{handle_get_archive, handle_list_archives, handle_validate_archive};
use crate::handlers::catalog::{handle_get_dependencies, handle_list_deployable_elements};
use crate::handlers::descriptors::{
    handle_get_export_descriptor, handle_list_export_descriptors, handle_save_export_descriptor,
};
use crate::handlers::id_maps::{handle_get_id_map, handle_save_id_map};
use crate::handlers::import_log::handle_get_import_log;
use crate::handlers::jobs::{
    handle_cancel_job, handle_export, handle_import, handle_job_status, handle_list_jobs,
    handle_validate,
};
use crate::handlers::session::{handle_connect, handle_disconnect, handle_extend_lock};
use crate::handlers::settings::{
    handle_get_dbms_map, handle_get_policy, handle_save_dbms_map, handle_save_policy,
};
use crate::{
    AppState, ErrorDocument, HandlerContext, Request, RequestContext, RequestDocument,
    ResponseDocument, Result as SessionErrorResult, SessionError,
};

use cm_core::ErrorLocation;

use std::panic::Location;
use std::time::Duration;

use log::{debug, error, info, warn};
use serde_json::Value;

const HANDLER_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle one request document.
///
/// Includes:
/// - Request parsing through the registry, before any state changes
/// - Advisory lock refresh for every pipeline operation
/// - Structured logging with a `[req user session]` prefix
/// - Orphaned lock release when an operation fails
pub async fn dispatch(
    doc: RequestDocument,
    state: &AppState,
) -> Result<ResponseDocument, ErrorDocument> {
    let mut request_ctx = RequestContext::new("", doc.session_id.clone().unwrap_or_default());
    let tag = doc.tag.clone();
    debug!("{} -> {} handler", request_ctx.log_prefix(), tag);

    let result = match tokio::time::timeout(
        HANDLER_TIMEOUT,
        dispatch_inner(&doc, state, &mut request_ctx),
    )
    .await
    {
        Ok(result) => result,
        Err(_elapsed) => {
            error!(
                "{} Handler {} timed out after {}s",
                request_ctx.log_prefix(),
                tag,
                HANDLER_TIMEOUT.as_secs()
            );
            Err(SessionError::Timeout {
                secs: HANDLER_TIMEOUT.as_secs(),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    };

    match result {
        Ok(body) => {
            info!(
                "{} <- {} completed in {}ms",
                request_ctx.log_prefix(),
                tag,
                request_ctx.elapsed_ms()
            );
            Ok(ResponseDocument::for_tag(&tag, body))
        }
        Err(e) => {
            let document = ErrorDocument::from(&e);
            warn!(
                "{} Handler {} failed: {} (code: {})",
                request_ctx.log_prefix(),
                tag,
                e,
                document.code
            );
            Err(document)
        }
    }
}

async fn dispatch_inner(
    doc: &RequestDocument,
    state: &AppState,
    request_ctx: &mut RequestContext,
) -> SessionErrorResult<Value> {
    let request = state.requests.parse(doc)?;

    if let Request::Connect {
        credentials,
        override_lock,
    } = &request
    {
        return handle_connect(credentials.as_deref(), *override_lock, state, request_ctx);
    }

    let session_id = doc
        .session_id
        .as_deref()
        .ok_or_else(|| SessionError::malformed("Request requires a session", Some("sessionId")))?;
    // Sessions whose lock expired or was taken over go once they sit idle.
    state.sessions.reap_idle(state.lock.hold(), |id| {
        id == session_id || state.lock.is_held_by(id)
    });
    let session = state.sessions.get(session_id)?;
    *request_ctx = request_ctx.clone().with_user(&session.user, &session.id);

    let ctx = HandlerContext {
        state: state.clone(),
        session,
        request_ctx: request_ctx.clone(),
    };

    let result = run_locked(request, &ctx).await;

    if result.is_err() {
        state
            .lock
            .release_orphan(&ctx.session.id, &ctx.session.user, |id| {
                state.sessions.is_live(id)
            });
    }

    result
}

/// Refresh the caller's lock, then run the operation.
async fn run_locked(request: Request, ctx: &HandlerContext) -> SessionErrorResult<Value> {
    if request.requires_lock() {
        ctx.state.lock.extend(&ctx.session.id)?;
    }

    match request {
        Request::Connect { .. } => Err(SessionError::malformed("Already connected", Some("tag"))),
        Request::Disconnect => handle_disconnect(ctx),
        Request::ExtendLock => handle_extend_lock(ctx),

        // Catalogue
        Request::ListDeployableElements { object_type } => {
            handle_list_deployable_elements(&object_type, ctx).await
        }
        Request::GetDependencies {
            object_type,
            parent_id,
        } => handle_get_dependencies(&object_type, &parent_id, ctx).await,

        // Export descriptors
        Request::GetExportDescriptor { name } => handle_get_export_descriptor(&name, ctx).await,
        Request::SaveExportDescriptor { descriptor } => {
            handle_save_export_descriptor(&descriptor, ctx).await
        }
        Request::ListExportDescriptors => handle_list_export_descriptors(ctx).await,

        // Archives
        Request::ValidateArchive {
            archive_ref,
            check_ref,
            warn_on_build_mismatch,
        } => handle_validate_archive(&archive_ref, check_ref, warn_on_build_mismatch, ctx).await,
        Request::GetArchive { archive_ref } => handle_get_archive(&archive_ref, ctx).await,
        Request::ListArchives => handle_list_archives(ctx).await,

        // Settings
        Request::GetDbmsMap => handle_get_dbms_map(ctx).await,
        Request::SaveDbmsMap { map } => handle_save_dbms_map(&map, ctx).await,
        Request::GetPolicy => handle_get_policy(ctx).await,
        Request::SavePolicy { policy } => handle_save_policy(&policy, ctx).await,

        // Identity maps
        Request::GetIdMap { source_server } => handle_get_id_map(&source_server, ctx).await,
        Request::SaveIdMap { map } => handle_save_id_map(&map, ctx).await,

        // Jobs
        Request::Export { descriptor_name } => handle_export(&descriptor_name, ctx).await,
        Request::Validate { archive_ref } => handle_validate(&archive_ref, ctx).await,
        Request::Import { archive_ref } => handle_import(&archive_ref, ctx).await,
        Request::JobStatus { job_id } => handle_job_status(&job_id, ctx).await,
        Request::CancelJob { job_id } => handle_cancel_job(&job_id, ctx).await,
        Request::ListJobs => handle_list_jobs(ctx).await,
        Request::GetImportLog { archive_log_id } => {
            handle_get_import_log(&archive_log_id, ctx).await
        }
    }
}
