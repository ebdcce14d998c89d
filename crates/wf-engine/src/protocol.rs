//! Wire envelopes exchanged with the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

/// Every command the dispatcher routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandKind {
    Ready,
    CreateWireframe,
    AddElement,
    StyleElement,
    ModifyElement,
    ArrangeLayout,
    ExportDesign,
    GetSelection,
    GetCurrentPage,
    SwitchPage,
    CreateRectangle,
    CreateEllipse,
    CreateText,
    CreateFrame,
    CreateComponent,
    CreateLine,
}

/// Inbound command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub correlation_id: Value,
}

impl Envelope {
    pub fn new(kind: impl Into<String>, payload: Value, correlation_id: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            payload,
            correlation_id: correlation_id.into(),
        }
    }

    /// A host menu command as an envelope: `create-wireframe` becomes kind
    /// `CREATE_WIREFRAME` with the raw name in the payload.
    pub fn from_menu_command(name: &str) -> Self {
        let kind = name.trim().replace('-', "_").to_ascii_uppercase();
        Self::new(kind, serde_json::json!({ "command": name }), Value::Null)
    }
}

/// Outbound reply. Exactly one per inbound envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub kind: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub correlation_id: Value,
    /// Loopback marker. Inbound messages carrying it are never dispatched.
    pub is_response: bool,
}

impl Response {
    pub fn ok(kind: impl Into<String>, data: Value, correlation_id: Value) -> Self {
        Self {
            kind: kind.into(),
            success: true,
            data: Some(data),
            error: None,
            correlation_id,
            is_response: true,
        }
    }

    pub fn fail(kind: impl Into<String>, error: impl Into<String>, correlation_id: Value) -> Self {
        Self {
            kind: kind.into(),
            success: false,
            data: None,
            error: Some(error.into()),
            correlation_id,
            is_response: true,
        }
    }
}

/// Whether a raw inbound message is one of our own responses looping back.
pub fn is_loopback(raw: &Value) -> bool {
    raw.get("isResponse").and_then(Value::as_bool).unwrap_or(false)
}

/// Unsolicited messages to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Notification {
    ShowUi {
        width: u32,
        height: u32,
    },
    #[serde(rename_all = "camelCase")]
    Started {
        root_id: String,
        page_name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn kinds_parse_from_screaming_snake() {
        assert_eq!(
            CommandKind::from_str("CREATE_WIREFRAME").unwrap(),
            CommandKind::CreateWireframe
        );
        assert_eq!(CommandKind::GetCurrentPage.to_string(), "GET_CURRENT_PAGE");
        assert!(CommandKind::from_str("create_wireframe").is_err());
        for kind in CommandKind::iter() {
            assert_eq!(CommandKind::from_str(&kind.to_string()).unwrap(), kind);
        }
    }

    #[test]
    fn envelope_defaults_missing_fields() {
        let env: Envelope = serde_json::from_value(json!({"kind": "READY"})).unwrap();
        assert_eq!(env.payload, Value::Null);
        assert_eq!(env.correlation_id, Value::Null);
    }

    #[test]
    fn menu_commands_map_to_kinds() {
        let env = Envelope::from_menu_command("get-current-page");
        assert_eq!(env.kind, "GET_CURRENT_PAGE");
        assert_eq!(env.payload, json!({"command": "get-current-page"}));
        assert_eq!(env.correlation_id, Value::Null);
    }

    #[test]
    fn failure_response_omits_data() {
        let resp = Response::fail("NOPE", "unknown command kind: NOPE", json!("c-1"));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "NOPE",
                "success": false,
                "error": "unknown command kind: NOPE",
                "correlationId": "c-1",
                "isResponse": true,
            })
        );
        assert!(is_loopback(&value));
    }

    #[test]
    fn notifications_are_type_tagged() {
        let started = Notification::Started {
            root_id: "1:0".into(),
            page_name: "Page 1".into(),
        };
        assert_eq!(
            serde_json::to_value(&started).unwrap(),
            json!({"type": "started", "rootId": "1:0", "pageName": "Page 1"})
        );
        assert_eq!(
            serde_json::to_value(Notification::ShowUi { width: 400, height: 600 }).unwrap(),
            json!({"type": "show-ui", "width": 400, "height": 600})
        );
    }
}
