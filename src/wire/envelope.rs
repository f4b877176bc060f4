//! Envelope encoding and defensive decoding.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::correlation::id::RequestId;
use crate::transport::RawMessage;

/// Field-name dialect for outbound envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WireDialect {
    /// `{ "id": ..., "action": ..., "data": ... }`
    #[default]
    Standard,
    /// `{ "messageId": ..., "postMessageType": ..., "data": ... }`
    Legacy,
}

/// An outbound request envelope. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct OutboundEnvelope {
    pub id: RequestId,
    pub action: String,
    pub data: Value,
}

impl OutboundEnvelope {
    /// Serialize to the wire text for the given dialect.
    pub fn encode(&self, dialect: WireDialect) -> String {
        let value = match dialect {
            WireDialect::Standard => json!({
                "id": self.id.as_u64(),
                "action": self.action,
                "data": self.data,
            }),
            WireDialect::Legacy => json!({
                "messageId": self.id.as_u64(),
                "postMessageType": self.action,
                "data": self.data,
            }),
        };
        value.to_string()
    }
}

/// The host's answer carried by an inbound envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// No `error` field: the call succeeds with the payload (`Null` when the
    /// host sent no `data`).
    Success(Value),
    /// An `error` field was present; the message is propagated verbatim.
    Error(String),
}

/// A decoded inbound envelope matched against the wire contract.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEnvelope {
    pub id: RequestId,
    pub reply: Reply,
}

/// Decode an inbound payload.
///
/// Returns `None` for anything that is not a well-formed envelope of this
/// protocol: unparseable text, non-object values, or a missing/unrecognizable
/// identifier. The channel is shared, so `None` means "not ours", not an
/// error.
pub fn decode(raw: RawMessage) -> Option<InboundEnvelope> {
    let value = match raw {
        RawMessage::Text(text) => serde_json::from_str::<Value>(&text).ok()?,
        RawMessage::Structured(value) => value,
    };
    let object = value.as_object()?;

    let id = object.get("id").or_else(|| object.get("messageId"))?;
    let id = parse_id(id)?;

    let reply = match object.get("error") {
        Some(Value::Null) | None => {
            Reply::Success(object.get("data").cloned().unwrap_or(Value::Null))
        }
        Some(Value::String(message)) => Reply::Error(message.clone()),
        // A non-string error is still an error; keep its JSON rendering.
        Some(other) => Reply::Error(other.to_string()),
    };

    Some(InboundEnvelope { id, reply })
}

/// Identifiers may arrive as a JSON number or a numeric string.
fn parse_id(value: &Value) -> Option<RequestId> {
    match value {
        Value::Number(number) => number.as_u64().map(RequestId::from_u64),
        Value::String(text) => text.parse::<u64>().ok().map(RequestId::from_u64),
        _ => None,
    }
}
