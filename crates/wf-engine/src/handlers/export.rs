//! `EXPORT_DESIGN`.

use super::decode;
use crate::engine::Engine;
use crate::error::{CommandError, CommandResult};
use crate::factory::lookup_node;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::{Value, json};
use wf_core::{ExportFormat, ExportSettings, Host, NodeRef};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExportPayload {
    node_ids: Option<Vec<String>>,
    format: Option<ExportFormat>,
    scale: Option<f32>,
}

/// Export the requested nodes (the selection when none are named). One
/// export future per node, joined; any failure fails the whole command.
pub async fn export_design<H: Host>(engine: &mut Engine<H>, payload: Value) -> CommandResult<Value> {
    let payload: ExportPayload = decode(payload)?;

    let nodes: Vec<NodeRef> = match &payload.node_ids {
        Some(raw) => raw
            .iter()
            .filter_map(|r| {
                let id = lookup_node(&engine.host, r);
                if id.is_none() {
                    log::warn!("skipping export of unknown node {r}");
                }
                id
            })
            .collect(),
        None => engine.host.selection(),
    };
    if nodes.is_empty() {
        return Err(CommandError::NothingToExport);
    }

    let settings = ExportSettings {
        format: payload
            .format
            .unwrap_or_else(|| engine.host.default_export_format()),
        scale: payload.scale.filter(|s| *s > 0.0).unwrap_or(1.0),
    };
    let host = &engine.host;
    let blobs = try_join_all(nodes.iter().map(|&id| host.export(id, settings))).await?;

    let exports: Vec<Value> = nodes
        .iter()
        .zip(blobs)
        .map(|(&id, bytes)| {
            let name = host.node(id).map(|n| n.name.clone()).unwrap_or_default();
            json!({
                "nodeId": id,
                "name": name,
                "format": settings.format,
                "extension": settings.format.extension(),
                "size": bytes.len(),
                "data": STANDARD.encode(&bytes),
            })
        })
        .collect();
    log::info!("exported {} nodes as {}", exports.len(), settings.format);
    Ok(json!({ "exports": exports }))
}
