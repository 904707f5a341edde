use crate::{HandlerContext, Result as SessionErrorResult, SessionError};

use cm_core::ExportDescriptor;
use cm_db::ExportDescriptorRepository;

use log::info;
use serde_json::{Value, json};

pub async fn handle_get_export_descriptor(
    name: &str,
    ctx: &HandlerContext,
) -> SessionErrorResult<Value> {
    let descriptor = ExportDescriptorRepository::new(ctx.pool())
        .find_by_name(name)
        .await?
        .ok_or_else(|| SessionError::not_found(format!("export descriptor '{name}'")))?;
    Ok(serde_json::to_value(descriptor).unwrap_or_default())
}

pub async fn handle_save_export_descriptor(
    descriptor: &ExportDescriptor,
    ctx: &HandlerContext,
) -> SessionErrorResult<Value> {
    ExportDescriptorRepository::new(ctx.pool())
        .save(descriptor)
        .await?;
    info!(
        "{} Saved export descriptor '{}' ({} packages)",
        ctx.log_prefix(),
        descriptor.name,
        descriptor.packages.len()
    );
    Ok(json!({ "name": descriptor.name }))
}

pub async fn handle_list_export_descriptors(ctx: &HandlerContext) -> SessionErrorResult<Value> {
    let names = ExportDescriptorRepository::new(ctx.pool())
        .list_names()
        .await?;
    Ok(json!({ "names": names }))
}
