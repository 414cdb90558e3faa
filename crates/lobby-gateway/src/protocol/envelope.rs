//! Action envelope
//!
//! All messages in both directions share the `{type, payload}` shape.
//! Parsing distinguishes malformed JSON from a missing `type` field, since
//! the two carry different error codes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The `{type, payload}` wire envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEnvelope {
    /// Action type, e.g. `DUEL_MOVE` or `APP_UPDATE`
    #[serde(rename = "type")]
    pub kind: String,

    /// Action payload; `null` when absent
    #[serde(default)]
    pub payload: Value,
}

/// Envelope parse failure
#[derive(Debug, Error)]
pub enum EnvelopeParseError {
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("no action type")]
    MissingType,
}

impl ActionEnvelope {
    /// Build an envelope
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Parse an inbound text frame
    pub fn parse(text: &str) -> Result<Self, EnvelopeParseError> {
        let value: Value = serde_json::from_str(text)?;
        let kind = match value.get("type").and_then(Value::as_str) {
            Some(kind) if !kind.is_empty() => kind.to_string(),
            _ => return Err(EnvelopeParseError::MissingType),
        };
        let payload = value.get("payload").cloned().unwrap_or(Value::Null);
        Ok(Self { kind, payload })
    }

    /// Serialize to a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl std::fmt::Display for ActionEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ActionEnvelope({})", self.kind)
    }
}
