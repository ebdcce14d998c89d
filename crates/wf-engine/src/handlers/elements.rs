//! Element creation and mutation: `ADD_ELEMENT`, `STYLE_ELEMENT`,
//! `MODIFY_ELEMENT` and the direct `CREATE_*` commands.

use super::{decode, node_summary, require_node};
use crate::engine::Engine;
use crate::error::{CommandError, CommandResult};
use crate::factory::{ElementKind, ElementProps, create_element, lookup_node};
use crate::style::{StyleOptions, apply_styles};
use serde::Deserialize;
use serde_json::Value;
use wf_core::{Host, NodeRef};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AddElementPayload {
    #[serde(alias = "type")]
    element_type: Option<String>,
    parent_id: Option<String>,
    wireframe_id: Option<String>,
    properties: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StylePayload {
    node_id: Option<String>,
    #[serde(alias = "style")]
    styles: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ModifyPayload {
    node_id: Option<String>,
    properties: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ModifyProps {
    name: Option<String>,
    locked: Option<bool>,
    #[serde(flatten)]
    style: StyleOptions,
}

/// Parent from a caller-supplied id. Unknown ids are logged and dropped so
/// the factory falls back to the context page.
fn parent_from<H: Host>(host: &H, raw: Option<&str>) -> Option<NodeRef> {
    let raw = raw?;
    let parent = lookup_node(host, raw);
    if parent.is_none() {
        log::warn!("parent {raw} not found; using the context page");
    }
    parent
}

/// Register a new element with the named wireframe, or the active one.
fn register<H: Host>(engine: &mut Engine<H>, wireframe: Option<&str>, node: NodeRef) {
    let named = wireframe
        .and_then(NodeRef::lookup)
        .filter(|id| engine.session.wireframe(*id).is_some());
    let target = named.or(engine.session.active_wireframe_id());
    engine.session.add_node_to_wireframe(target, Some(node));
}

pub async fn add_element<H: Host>(engine: &mut Engine<H>, payload: Value) -> CommandResult<Value> {
    let payload: AddElementPayload = decode(payload)?;
    let raw_kind = payload
        .element_type
        .as_deref()
        .ok_or(CommandError::MissingField("elementType"))?;
    let kind = ElementKind::parse(raw_kind)?;
    let props = ElementProps::from_value(&payload.properties)?;
    let parent = parent_from(&engine.host, payload.parent_id.as_deref());

    let id = create_element(engine, kind, parent, &props).await?;
    register(engine, payload.wireframe_id.as_deref(), id);
    Ok(node_summary(&engine.host, id))
}

/// The direct `CREATE_<KIND>` commands: the payload is the property bag.
pub async fn create_direct<H: Host>(
    engine: &mut Engine<H>,
    kind: ElementKind,
    payload: Value,
) -> CommandResult<Value> {
    let props = ElementProps::from_value(&payload)?;
    let parent_id = payload.get("parentId").and_then(Value::as_str);
    let parent = parent_from(&engine.host, parent_id);

    let id = create_element(engine, kind, parent, &props).await?;
    register(engine, None, id);
    Ok(node_summary(&engine.host, id))
}

pub async fn style_element<H: Host>(engine: &mut Engine<H>, payload: Value) -> CommandResult<Value> {
    let payload: StylePayload = decode(payload)?;
    let id = require_node(&engine.host, payload.node_id.as_deref(), "nodeId")?;
    let styles = StyleOptions::from_value(&payload.styles)?;
    let brand = engine.session.brand_colors().clone();
    apply_styles(&mut engine.host, id, &styles, &brand, &engine.config).await?;
    Ok(node_summary(&engine.host, id))
}

pub async fn modify_element<H: Host>(engine: &mut Engine<H>, payload: Value) -> CommandResult<Value> {
    let payload: ModifyPayload = decode(payload)?;
    let id = require_node(&engine.host, payload.node_id.as_deref(), "nodeId")?;
    let props: ModifyProps = decode(payload.properties)?;

    if let Some(node) = engine.host.node_mut(id) {
        if let Some(name) = props.name {
            node.name = name;
        }
        if let Some(locked) = props.locked {
            node.locked = locked;
        }
    }
    let brand = engine.session.brand_colors().clone();
    apply_styles(&mut engine.host, id, &props.style, &brand, &engine.config).await?;
    Ok(node_summary(&engine.host, id))
}
