use crate::{HandlerContext, Result as SessionErrorResult, SessionError};

use cm_db::ImportLogRepository;

use serde_json::{Value, json};

/// Every package entry of one import run, with its transactions.
pub async fn handle_get_import_log(
    archive_log_id: &str,
    ctx: &HandlerContext,
) -> SessionErrorResult<Value> {
    let repo = ImportLogRepository::new(ctx.pool());
    let entries = repo.find_by_run(archive_log_id).await?;
    if entries.is_empty() {
        return Err(SessionError::not_found(format!("import log '{archive_log_id}'")));
    }

    let mut packages = Vec::with_capacity(entries.len());
    for entry in entries {
        let transactions = repo.find_transactions(&entry.id).await?;
        packages.push(json!({
            "entry": entry,
            "transactions": transactions,
        }));
    }

    Ok(json!({ "archiveLogId": archive_log_id, "packages": packages }))
}
