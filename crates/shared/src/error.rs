//! Errors raised while reading backend payloads.

use thiserror::Error;

/// A payload did not have the shape the console expects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Required fields missing or of the wrong type
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl ProtocolError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}
