use serde::Deserialize;
use serde_json::Value;

use crate::outcome::UploadOutcome;
use crate::REJECTION_FALLBACK;

/// Wire shape of `{ "is_success": bool, "errors": ... }`.
#[derive(Debug, Deserialize)]
struct SuccessFlag {
    is_success: bool,
    #[serde(default)]
    errors: Value,
}

/// A business-rule rejection reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionEnvelope {
    messages: Vec<String>,
    listed: bool,
}

impl RejectionEnvelope {
    /// Try to read a rejection out of `value`.
    ///
    /// Matches only when `is_success` is `false` and `errors` is present
    /// and not falsy (`null`, `false`, `0`, `""`).
    pub fn parse(value: &Value) -> Option<Self> {
        let flag = SuccessFlag::deserialize(value).ok()?;
        if flag.is_success || !truthy(&flag.errors) {
            return None;
        }

        let envelope = match flag.errors {
            Value::Array(items) => Self {
                messages: items.into_iter().map(message_text).collect(),
                listed: true,
            },
            other => Self {
                messages: vec![message_text(other)],
                listed: false,
            },
        };
        Some(envelope)
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Errors joined with `", "`, or the fixed fallback when the backend sent
    /// an empty list or something other than a list.
    pub fn summary(&self) -> String {
        if self.listed && !self.messages.is_empty() {
            self.messages.join(", ")
        } else {
            REJECTION_FALLBACK.to_owned()
        }
    }

    pub fn into_outcome(self) -> UploadOutcome {
        let summary = self.summary();
        UploadOutcome::Rejected {
            messages: self.messages,
            summary,
        }
    }
}

/// Error body carrying a human-readable `message`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageEnvelope {
    pub message: String,
}

impl MessageEnvelope {
    pub fn parse(value: &Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn message_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
