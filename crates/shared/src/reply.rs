//! Normalization of `POST /set/prompt` replies.
//!
//! The assistant relays the simulation's answer as raw bytes, so the body
//! arrives either as a JSON object or as a JSON string holding the encoded
//! object. Both are accepted; anything else is a malformed payload.
//!
//! Once decoded, a reply that carries both object lists, each non-empty, is
//! a scene update; any other reply is an advisory message from the assistant.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ProtocolError;

/// A decoded instruction reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply {
    /// The simulation executed something and reported the new scene
    SceneUpdate {
        message: String,
        available_prefabs: String,
        current_objects: String,
    },
    /// The assistant answered without touching the scene
    Advisory { message: String },
}

#[derive(Debug, Deserialize)]
struct ReplyFields {
    message: String,
    #[serde(default)]
    available_prefabs: Option<String>,
    #[serde(default)]
    current_objects: Option<String>,
}

impl PromptReply {
    /// Decode a reply body in either wire representation.
    pub fn from_body(body: Value) -> Result<Self, ProtocolError> {
        let mut object = normalize_body(body)?;

        let response = object
            .remove("response")
            .ok_or_else(|| ProtocolError::malformed("reply has no response field"))?;
        let fields: ReplyFields = serde_json::from_value(response)?;

        let present = |list: Option<String>| list.filter(|names| !names.is_empty());
        Ok(match (present(fields.available_prefabs), present(fields.current_objects)) {
            (Some(available_prefabs), Some(current_objects)) => Self::SceneUpdate {
                message: fields.message,
                available_prefabs,
                current_objects,
            },
            _ => Self::Advisory {
                message: fields.message,
            },
        })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::SceneUpdate { message, .. } | Self::Advisory { message } => message,
        }
    }

    pub fn is_scene_update(&self) -> bool {
        matches!(self, Self::SceneUpdate { .. })
    }
}

/// Type-check the body before parsing: objects pass through, strings are
/// decoded once, everything else is rejected.
fn normalize_body(body: Value) -> Result<Map<String, Value>, ProtocolError> {
    match body {
        Value::Object(object) => Ok(object),
        Value::String(encoded) => {
            tracing::debug!(len = encoded.len(), "Decoding string-encoded reply body");
            match serde_json::from_str::<Value>(&encoded)? {
                Value::Object(object) => Ok(object),
                _ => Err(ProtocolError::malformed(
                    "string-encoded reply does not hold an object",
                )),
            }
        }
        other => Err(ProtocolError::malformed(format!(
            "reply body is neither an object nor a string: {}",
            other
        ))),
    }
}
