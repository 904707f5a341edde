use crate::{HandlerContext, Result as SessionErrorResult};

use cm_core::IdentityMap;
use cm_db::IdMapRepository;

use log::info;
use serde_json::{Value, json};

pub async fn handle_get_id_map(
    source_server: &str,
    ctx: &HandlerContext,
) -> SessionErrorResult<Value> {
    let map = IdMapRepository::new(ctx.pool())
        .get_id_map(source_server)
        .await?;
    Ok(serde_json::to_value(map).unwrap_or_default())
}

pub async fn handle_save_id_map(map: &IdentityMap, ctx: &HandlerContext) -> SessionErrorResult<Value> {
    IdMapRepository::new(ctx.pool()).save_id_map(map).await?;
    info!(
        "{} Saved identity map for {} ({} mappings)",
        ctx.log_prefix(),
        map.source_server,
        map.len()
    );
    Ok(json!({ "sourceServer": map.source_server, "mappings": map.len() }))
}
