use crate::{HandlerContext, Result as SessionErrorResult};

use cm_engine::{ExportJob, ImportJob, JobKind, ValidationJob};

use log::info;
use serde_json::{Value, json};

pub async fn handle_export(descriptor_name: &str, ctx: &HandlerContext) -> SessionErrorResult<Value> {
    let job = ExportJob::new(ctx.state.engine.clone(), descriptor_name, ctx.user());
    let job_id = ctx
        .state
        .jobs
        .spawn(JobKind::Export, ctx.user(), move |progress, cancel| async move {
            job.run(&progress, &cancel).await
        });

    info!("{} Export of '{descriptor_name}' started as {job_id}", ctx.log_prefix());
    Ok(json!({ "jobId": job_id }))
}

pub async fn handle_validate(archive_ref: &str, ctx: &HandlerContext) -> SessionErrorResult<Value> {
    let job = ValidationJob::new(ctx.state.engine.clone(), archive_ref);
    let job_id = ctx
        .state
        .jobs
        .spawn(JobKind::Validate, ctx.user(), move |progress, cancel| async move {
            job.run(&progress, &cancel).await
        });

    info!("{} Validation of {archive_ref} started as {job_id}", ctx.log_prefix());
    Ok(json!({ "jobId": job_id }))
}

/// Start an import. Fails immediately while another import holds the
/// publisher lock.
pub async fn handle_import(archive_ref: &str, ctx: &HandlerContext) -> SessionErrorResult<Value> {
    let job = ImportJob::new(ctx.state.engine.clone(), archive_ref)?;
    let archive_log_id = job.run_id().to_string();
    let job_id = ctx
        .state
        .jobs
        .spawn(JobKind::Import, ctx.user(), move |progress, cancel| async move {
            job.run(&progress, &cancel).await
        });

    info!("{} Import of {archive_ref} started as {job_id}", ctx.log_prefix());
    Ok(json!({ "jobId": job_id, "archiveLogId": archive_log_id }))
}

pub async fn handle_job_status(job_id: &str, ctx: &HandlerContext) -> SessionErrorResult<Value> {
    let status = ctx.state.jobs.status(job_id)?;
    Ok(serde_json::to_value(status).unwrap_or_default())
}

/// Retained jobs, oldest first.
pub async fn handle_list_jobs(ctx: &HandlerContext) -> SessionErrorResult<Value> {
    let jobs = ctx.state.jobs.list();
    Ok(json!({ "jobs": jobs }))
}

pub async fn handle_cancel_job(job_id: &str, ctx: &HandlerContext) -> SessionErrorResult<Value> {
    let cancelled = ctx.state.jobs.cancel(job_id)?;
    Ok(json!({ "jobId": job_id, "cancelled": cancelled }))
}
