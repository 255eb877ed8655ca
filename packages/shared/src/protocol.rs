//! Wire protocol between the notifier and the welcome server.
//!
//! Every frame is a JSON text frame tagged by its `event` name. The same
//! name, `newMessage`, is used in both directions:
//!
//! - inbound: `{"event":"newMessage","data":{"message":"Hello"}}`
//! - outbound: `{"event":"newMessage"}` (a request for the current text)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Event name shared by the request and the pushed welcome text.
pub const NEW_MESSAGE_EVENT: &str = "newMessage";

/// Protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame is not valid JSON or does not match a known event
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Events pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum InboundEvent {
    #[serde(rename = "newMessage")]
    NewMessage(WelcomePayload),
}

/// Events sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum OutboundEvent {
    /// Ask the server to push the current welcome text.
    #[serde(rename = "newMessage")]
    NewMessage,
}

/// Payload of an inbound `newMessage` event.
///
/// `message` is kept as raw JSON so that non-string values can still be
/// shown; `null` and a missing field both decode to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelcomePayload {
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}

impl WelcomePayload {
    /// Create a payload carrying a plain string message
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: Some(serde_json::Value::String(message.into())),
        }
    }

    /// Coerce the message to display text.
    ///
    /// Strings are returned verbatim, any other JSON value as its JSON text.
    /// Returns `None` when the payload carries no message.
    pub fn message_text(&self) -> Option<String> {
        match self.message.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Decode a text frame received from the server
pub fn decode_inbound(frame: &str) -> Result<InboundEvent, ProtocolError> {
    Ok(serde_json::from_str(frame)?)
}

/// Encode an event for sending to the server
pub fn encode_outbound(event: &OutboundEvent) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(event)?)
}
