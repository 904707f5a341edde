use crate::{HandlerContext, Result as SessionErrorResult};

use cm_archive::{ArchiveReader, check_compatibility, list_archives};
use cm_db::SettingsRepository;

use log::{debug, warn};
use serde_json::{Value, json};

/// Check an archive can be imported here.
///
/// With `check_ref` a missing archive is an error; without it the result
/// reports `exists: false`.
pub async fn handle_validate_archive(
    archive_ref: &str,
    check_ref: bool,
    warn_on_build_mismatch: Option<bool>,
    ctx: &HandlerContext,
) -> SessionErrorResult<Value> {
    let reader = match ArchiveReader::open(&ctx.state.engine.archive_dir, archive_ref) {
        Ok(reader) => reader,
        Err(e) if e.is_not_found() && !check_ref => {
            debug!("{} Archive {archive_ref} not present", ctx.log_prefix());
            return Ok(json!({ "archiveRef": archive_ref, "exists": false }));
        }
        Err(e) => return Err(e.into()),
    };

    let warn_on_build_mismatch = match warn_on_build_mismatch {
        Some(warn) => warn,
        None => {
            SettingsRepository::new(ctx.pool())
                .get_policy()
                .await?
                .warn_on_build_mismatch
        }
    };

    let warnings = check_compatibility(
        reader.info(),
        &ctx.state.engine.identity.server_build,
        warn_on_build_mismatch,
    )?;
    for warning in &warnings {
        warn!("{} {archive_ref}: {warning}", ctx.log_prefix());
    }

    Ok(json!({
        "archiveRef": reader.archive_ref(),
        "exists": true,
        "summary": reader.summary(),
        "warnings": warnings,
    }))
}

pub async fn handle_get_archive(archive_ref: &str, ctx: &HandlerContext) -> SessionErrorResult<Value> {
    let reader = ArchiveReader::open(&ctx.state.engine.archive_dir, archive_ref)?;
    Ok(serde_json::to_value(reader.summary()).unwrap_or_default())
}

pub async fn handle_list_archives(ctx: &HandlerContext) -> SessionErrorResult<Value> {
    let archives = list_archives(&ctx.state.engine.archive_dir)?;
    Ok(json!({ "archives": archives }))
}
