//! Envelope decoding and routing.
//!
//! Every envelope that is not a loopback gets exactly one [`Response`],
//! carrying the inbound correlation id, whatever the handler did.

use crate::engine::Engine;
use crate::error::CommandResult;
use crate::factory::ElementKind;
use crate::handlers::{elements, export, layout, queries, wireframe};
use crate::protocol::{CommandKind, Envelope, Response, is_loopback};
use serde_json::Value;
use std::str::FromStr;
use wf_core::Host;

impl<H: Host> Engine<H> {
    /// Handle one raw inbound message. Returns `None` for our own responses
    /// echoed back at us.
    pub async fn dispatch(&mut self, raw: Value) -> Option<Response> {
        if is_loopback(&raw) {
            log::debug!("dropping loopback message");
            return None;
        }
        let correlation_id = raw.get("correlationId").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<Envelope>(raw.clone()) {
            Ok(envelope) => Some(self.handle(envelope).await),
            Err(err) => {
                let kind = raw
                    .get("kind")
                    .and_then(Value::as_str)
                    .unwrap_or("UNKNOWN")
                    .to_string();
                log::warn!("malformed envelope: {err}");
                Some(Response::fail(kind, format!("malformed envelope: {err}"), correlation_id))
            }
        }
    }

    /// Run a decoded envelope to completion.
    pub async fn handle(&mut self, envelope: Envelope) -> Response {
        let Envelope {
            kind: raw_kind,
            payload,
            correlation_id,
        } = envelope;

        let Ok(kind) = CommandKind::from_str(&raw_kind) else {
            log::warn!("unknown command kind {raw_kind}");
            let error = format!("unknown command kind: {raw_kind}");
            return Response::fail(raw_kind, error, correlation_id);
        };

        log::debug!("handling {kind}");
        match self.route(kind, payload).await {
            Ok(data) => Response::ok(raw_kind, data, correlation_id),
            Err(err) => {
                log::warn!("{kind} failed: {err}");
                Response::fail(raw_kind, err.to_string(), correlation_id)
            }
        }
    }

    async fn route(&mut self, kind: CommandKind, payload: Value) -> CommandResult<Value> {
        match kind {
            CommandKind::Ready => queries::ready(self),
            CommandKind::CreateWireframe => wireframe::create_wireframe(self, payload),
            CommandKind::AddElement => elements::add_element(self, payload).await,
            CommandKind::StyleElement => elements::style_element(self, payload).await,
            CommandKind::ModifyElement => elements::modify_element(self, payload).await,
            CommandKind::ArrangeLayout => layout::arrange_layout(self, payload).await,
            CommandKind::ExportDesign => export::export_design(self, payload).await,
            CommandKind::GetSelection => queries::get_selection(self),
            CommandKind::GetCurrentPage => queries::get_current_page(self),
            CommandKind::SwitchPage => queries::switch_page(self, payload),
            CommandKind::CreateRectangle => {
                elements::create_direct(self, ElementKind::Rectangle, payload).await
            }
            CommandKind::CreateEllipse => {
                elements::create_direct(self, ElementKind::Ellipse, payload).await
            }
            CommandKind::CreateText => elements::create_direct(self, ElementKind::Text, payload).await,
            CommandKind::CreateFrame => elements::create_direct(self, ElementKind::Frame, payload).await,
            CommandKind::CreateComponent => {
                elements::create_direct(self, ElementKind::Component, payload).await
            }
            CommandKind::CreateLine => elements::create_direct(self, ElementKind::Line, payload).await,
        }
    }
}
