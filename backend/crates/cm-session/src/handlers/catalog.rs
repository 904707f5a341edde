use crate::{HandlerContext, Result as SessionErrorResult};

use cm_core::DependencyRef;

use log::debug;
use serde_json::Value;

pub async fn handle_list_deployable_elements(
    object_type: &str,
    ctx: &HandlerContext,
) -> SessionErrorResult<Value> {
    let elements = ctx.state.engine.model.list_deployable(object_type).await?;
    debug!(
        "{} {} deployable {object_type} elements",
        ctx.log_prefix(),
        elements.len()
    );
    Ok(serde_json::to_value(elements).unwrap_or_default())
}

/// Direct children of one object, as the object model reports them.
pub async fn handle_get_dependencies(
    object_type: &str,
    parent_id: &str,
    ctx: &HandlerContext,
) -> SessionErrorResult<Value> {
    let model = ctx.state.engine.model.as_ref();
    let parent = model
        .lookup(&DependencyRef::new(object_type, parent_id))
        .await?;
    let children = model.children(&parent).await?;
    Ok(serde_json::to_value(children).unwrap_or_default())
}
