use serde_json::{json, Value};

use crate::DELIVERED_MESSAGE;

/// File bytes handed to the platform for delivery to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Result of one submission. Exactly one variant per call.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Ok {
        data: Value,
    },
    FileDelivered {
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    },
    Rejected {
        messages: Vec<String>,
        summary: String,
    },
    TransportFailed {
        summary: String,
    },
}

impl UploadOutcome {
    pub fn transport_failed<S: Into<String>>(summary: S) -> Self {
        Self::TransportFailed {
            summary: summary.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok { .. } | Self::FileDelivered { .. })
    }

    /// User-facing error text, if the submission failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Rejected { summary, .. }
            | Self::TransportFailed { summary } => Some(summary),
            _ => None,
        }
    }

    /// Individual rejection messages, empty for every other variant.
    pub fn error_messages(&self) -> &[String] {
        match self {
            Self::Rejected { messages, .. } => messages,
            _ => &[],
        }
    }

    /// Success payload as the page components consume it. A delivered file
    /// is reported as `{ message, filename }`.
    pub fn data(&self) -> Option<Value> {
        match self {
            Self::Ok { data } => Some(data.clone()),
            Self::FileDelivered { filename, .. } => Some(json!({
                "message": DELIVERED_MESSAGE,
                "filename": filename,
            })),
            _ => None,
        }
    }
}

impl From<Download> for UploadOutcome {
    fn from(download: Download) -> Self {
        Self::FileDelivered {
            filename: download.filename,
            content_type: download.content_type,
            bytes: download.bytes,
        }
    }
}
