//! Read-only queries and page switching: `READY`, `GET_SELECTION`,
//! `GET_CURRENT_PAGE`, `SWITCH_PAGE`.

use super::{decode, node_summary};
use crate::engine::Engine;
use crate::error::{CommandError, CommandResult};
use serde::Deserialize;
use serde_json::{Value, json};
use wf_core::{Host, NodeRef};

fn page_summary<H: Host>(host: &H, page: NodeRef) -> Value {
    json!({
        "id": page,
        "name": host.node(page).map(|n| n.name.as_str()).unwrap_or_default(),
        "childCount": host.children(page).len(),
    })
}

pub fn ready<H: Host>(engine: &mut Engine<H>) -> CommandResult<Value> {
    let page = engine.context_page();
    Ok(json!({
        "status": "ready",
        "page": page_summary(&engine.host, page),
        "activeWireframeId": engine.session.active_wireframe_id(),
    }))
}

pub fn get_selection<H: Host>(engine: &mut Engine<H>) -> CommandResult<Value> {
    let selection: Vec<Value> = engine
        .host
        .selection()
        .into_iter()
        .map(|id| node_summary(&engine.host, id))
        .collect();
    Ok(json!({ "selection": selection }))
}

pub fn get_current_page<H: Host>(engine: &mut Engine<H>) -> CommandResult<Value> {
    let page = engine.host.current_page();
    let mut data = page_summary(&engine.host, page);
    data["activePageId"] = json!(engine.context_page());
    data["pages"] = json!(engine.host.pages());
    Ok(data)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SwitchPayload {
    page_id: Option<String>,
}

pub fn switch_page<H: Host>(engine: &mut Engine<H>, payload: Value) -> CommandResult<Value> {
    let payload: SwitchPayload = decode(payload)?;
    let raw = payload.page_id.ok_or(CommandError::MissingField("pageId"))?;
    let page = NodeRef::lookup(&raw).ok_or_else(|| CommandError::PageNotFound(raw.clone()))?;
    if !engine.session.switch_to_page(&mut engine.host, page) {
        return Err(CommandError::PageNotFound(raw));
    }
    Ok(page_summary(&engine.host, page))
}
