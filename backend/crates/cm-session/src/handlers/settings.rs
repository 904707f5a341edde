use crate::{HandlerContext, Result as SessionErrorResult};

use cm_core::{DbmsMap, PolicySettings};
use cm_db::SettingsRepository;

use log::info;
use serde_json::{Value, json};

pub async fn handle_get_policy(ctx: &HandlerContext) -> SessionErrorResult<Value> {
    let policy = SettingsRepository::new(ctx.pool()).get_policy().await?;
    Ok(serde_json::to_value(policy).unwrap_or_default())
}

pub async fn handle_save_policy(
    policy: &PolicySettings,
    ctx: &HandlerContext,
) -> SessionErrorResult<Value> {
    SettingsRepository::new(ctx.pool())
        .save_policy(policy)
        .await?;
    info!("{} Saved policy {:?}", ctx.log_prefix(), policy);
    Ok(json!({ "saved": true }))
}

pub async fn handle_get_dbms_map(ctx: &HandlerContext) -> SessionErrorResult<Value> {
    let map = SettingsRepository::new(ctx.pool()).get_dbms_map().await?;
    Ok(serde_json::to_value(map).unwrap_or_default())
}

pub async fn handle_save_dbms_map(map: &DbmsMap, ctx: &HandlerContext) -> SessionErrorResult<Value> {
    SettingsRepository::new(ctx.pool())
        .save_dbms_map(map)
        .await?;
    info!(
        "{} Saved DBMS map ({} entries)",
        ctx.log_prefix(),
        map.mappings.len()
    );
    Ok(json!({ "saved": true }))
}
