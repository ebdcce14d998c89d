//! `ARRANGE_LAYOUT`.

use super::{decode, node_summary};
use crate::engine::Engine;
use crate::error::{CommandError, CommandResult};
use crate::factory::lookup_node;
use crate::style::{PaddingInput, StyleOptions, apply_styles, lenient};
use serde::Deserialize;
use serde_json::{Value, json};
use wf_core::{Host, HostError, NodeRef, PrimitiveKind, Rect, has_layout};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ArrangePayload {
    container_id: Option<String>,
    node_ids: Option<Vec<String>>,
    /// `horizontal`/`row` or `vertical`/`column`.
    direction: Option<String>,
    #[serde(alias = "gap", deserialize_with = "lenient")]
    spacing: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    padding: Option<PaddingInput>,
    /// Primary-axis alignment.
    alignment: Option<String>,
    counter_alignment: Option<String>,
    name: Option<String>,
}

/// Turn a container into an auto-layout container, or wrap loose nodes in a
/// new one, and lay out its children.
pub async fn arrange_layout<H: Host>(engine: &mut Engine<H>, payload: Value) -> CommandResult<Value> {
    let payload: ArrangePayload = decode(payload)?;

    let container = match (&payload.container_id, &payload.node_ids) {
        (Some(raw), _) => {
            let id = lookup_node(&engine.host, raw)
                .ok_or_else(|| CommandError::NodeNotFound(raw.clone()))?;
            if !engine.host.node(id).is_some_and(has_layout) {
                return Err(CommandError::NotAContainer(id));
            }
            id
        }
        (None, Some(raw_ids)) if !raw_ids.is_empty() => {
            let mut nodes = Vec::with_capacity(raw_ids.len());
            for raw in raw_ids {
                let id = lookup_node(&engine.host, raw)
                    .ok_or_else(|| CommandError::NodeNotFound(raw.clone()))?;
                nodes.push(id);
            }
            wrap_in_frame(engine, &nodes, payload.name.as_deref())?
        }
        _ => return Err(CommandError::MissingField("containerId")),
    };

    let styles = StyleOptions {
        layout_mode: Some(payload.direction.unwrap_or_else(|| "VERTICAL".to_string())),
        item_spacing: payload.spacing,
        padding: payload.padding,
        primary_axis_align_items: payload.alignment,
        counter_axis_align_items: payload.counter_alignment,
        ..StyleOptions::default()
    };
    let brand = engine.session.brand_colors().clone();
    apply_styles(&mut engine.host, container, &styles, &brand, &engine.config).await?;

    let mut data = node_summary(&engine.host, container);
    data["children"] = json!(engine.host.children(container));
    Ok(data)
}

/// A transparent, hugging frame at the nodes' union bounds, under the first
/// node's parent, holding `nodes` in order at their original positions.
fn wrap_in_frame<H: Host>(
    engine: &mut Engine<H>,
    nodes: &[NodeRef],
    name: Option<&str>,
) -> CommandResult<NodeRef> {
    for &id in nodes {
        let outer = nodes
            .iter()
            .find(|&&other| other != id && is_inside(&engine.host, id, other));
        if let Some(&outer) = outer {
            log::warn!("cannot wrap {id} together with its ancestor {outer}");
            return Err(HostError::InvalidParent(outer).into());
        }
    }
    let parent = match engine.host.parent_of(nodes[0]) {
        Some(p) => p,
        None => engine.context_page(),
    };
    let bounds = nodes
        .iter()
        .filter_map(|&id| engine.host.node(id).map(|n| n.bounds()))
        .reduce(|a, b| a.union(&b))
        .unwrap_or(Rect::default());

    let frame = engine.host.create_node(PrimitiveKind::Frame)?;
    engine.host.append_child(parent, frame)?;
    engine.host.set_position(frame, bounds.x, bounds.y)?;
    engine.host.resize(frame, bounds.width, bounds.height)?;
    if let Some(node) = engine.host.node_mut(frame) {
        node.name = name.unwrap_or("Auto Layout").to_string();
        node.fills.clear();
    }
    for &id in nodes {
        let Some((x, y)) = engine.host.node(id).map(|n| (n.x, n.y)) else {
            continue;
        };
        engine.host.append_child(frame, id)?;
        engine.host.set_position(id, x - bounds.x, y - bounds.y)?;
    }
    Ok(frame)
}

fn is_inside<H: Host>(host: &H, node: NodeRef, ancestor: NodeRef) -> bool {
    let mut current = host.parent_of(node);
    while let Some(p) = current {
        if p == ancestor {
            return true;
        }
        current = host.parent_of(p);
    }
    false
}
