//! One handler per command kind. Each takes the engine and the raw payload
//! and returns the response `data`, or a [`CommandError`] the dispatcher
//! turns into a failure response.

pub mod elements;
pub mod export;
pub mod layout;
pub mod queries;
pub mod wireframe;

use crate::error::{CommandError, CommandResult};
use crate::factory::lookup_node;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use wf_core::{Host, NodeRef};

/// Decode a payload; a missing payload decodes as the default.
pub(crate) fn decode<T: DeserializeOwned + Default>(payload: Value) -> CommandResult<T> {
    if payload.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(payload)?)
}

/// Resolve a required node id field.
pub(crate) fn require_node<H: Host>(
    host: &H,
    raw: Option<&str>,
    field: &'static str,
) -> CommandResult<NodeRef> {
    let raw = raw.ok_or(CommandError::MissingField(field))?;
    lookup_node(host, raw).ok_or_else(|| CommandError::NodeNotFound(raw.to_string()))
}

/// What the caller sees of a node.
pub fn node_summary<H: Host>(host: &H, id: NodeRef) -> Value {
    let Some(node) = host.node(id) else {
        return json!({ "id": id });
    };
    json!({
        "id": id,
        "name": node.name,
        "type": node.kind.type_name(),
        "x": node.x,
        "y": node.y,
        "width": node.width,
        "height": node.height,
        "visible": node.visible,
        "locked": node.locked,
        "parentId": host.parent_of(id),
        "childCount": host.children(id).len(),
    })
}
