//! Turning a finished HTTP exchange into an [`UploadOutcome`].
//!
//! The backend reports rejections both with `200` and with error statuses,
//! and returns either a raw file stream or a JSON envelope. Which branch is
//! taken depends on the content of the body, not on the status alone.

use std::str;

use log::{debug, warn};
use mime::Mime;
use reqwest::StatusCode;
use serde_json::Value;

use crate::disposition;
use crate::envelope::{MessageEnvelope, RejectionEnvelope};
use crate::outcome::{Download, UploadOutcome};
use crate::{Result, DEFAULT_CONTENT_TYPE, TRANSPORT_FALLBACK};

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Binary(Vec<u8>),
    Structured(Value),
}

/// Everything the classifier needs from a response.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: ResponseBody,
}

impl CapturedResponse {
    pub fn binary(status: StatusCode, bytes: Vec<u8>) -> Self {
        Self {
            status,
            content_type: None,
            content_disposition: None,
            body: ResponseBody::Binary(bytes),
        }
    }

    pub fn structured(status: StatusCode, value: Value) -> Self {
        Self {
            status,
            content_type: Some(mime::APPLICATION_JSON.to_string()),
            content_disposition: None,
            body: ResponseBody::Structured(value),
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, value: S) -> Self {
        self.content_type = Some(value.into());
        self
    }

    pub fn with_disposition<S: Into<String>>(mut self, value: S) -> Self {
        self.content_disposition = Some(value.into());
        self
    }

    /// Whether the declared content type is JSON (`application/json` or a
    /// `+json` suffix).
    pub fn declares_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(is_json_content_type)
            .unwrap_or(false)
    }
}

/// A request either produced a response or failed before one arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum Exchange {
    Completed(CapturedResponse),
    Failed { reason: String },
}

/// Pure classification of an exchange.
pub fn classify(exchange: &Exchange) -> UploadOutcome {
    match exchange {
        Exchange::Completed(response) if response.status.is_success() => {
            classify_success(response)
        }
        Exchange::Completed(response) => classify_error(response),
        Exchange::Failed { reason } => {
            debug!("Request failed without a response: {}", reason);
            UploadOutcome::transport_failed(TRANSPORT_FALLBACK)
        }
    }
}

fn classify_success(response: &CapturedResponse) -> UploadOutcome {
    match &response.body {
        ResponseBody::Structured(value) => RejectionEnvelope::parse(value)
            .map(RejectionEnvelope::into_outcome)
            .unwrap_or_else(|| UploadOutcome::Ok {
                data: value.clone(),
            }),
        ResponseBody::Binary(bytes) => {
            if response.declares_json() {
                if let Some(rejection) = decode_json(bytes)
                    .ok()
                    .as_ref()
                    .and_then(RejectionEnvelope::parse)
                {
                    return rejection.into_outcome();
                }
            }
            download(response, bytes).into()
        }
    }
}

fn classify_error(response: &CapturedResponse) -> UploadOutcome {
    let value = match &response.body {
        ResponseBody::Structured(value) => Some(value.clone()),
        ResponseBody::Binary(bytes) if response.declares_json() => {
            match decode_json(bytes) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Error parsing error response: {}", e);
                    None
                }
            }
        }
        ResponseBody::Binary(_) => None,
    };

    if let Some(value) = value {
        if let Some(rejection) = RejectionEnvelope::parse(&value) {
            return rejection.into_outcome();
        }
        if let Some(MessageEnvelope { message }) =
            MessageEnvelope::parse(&value)
        {
            return UploadOutcome::transport_failed(message);
        }
    }

    debug!("Upload failed with status {}", response.status);
    UploadOutcome::transport_failed(TRANSPORT_FALLBACK)
}

fn download(response: &CapturedResponse, bytes: &[u8]) -> Download {
    let filename =
        disposition::filename(response.content_disposition.as_deref());
    let content_type = response
        .content_type
        .clone()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned());

    Download {
        filename,
        content_type,
        bytes: bytes.to_vec(),
    }
}

fn decode_json(bytes: &[u8]) -> Result<Value> {
    let text = str::from_utf8(bytes)?;
    Ok(serde_json::from_str(text)?)
}

pub fn is_json_content_type(value: &str) -> bool {
    let value = value.to_ascii_lowercase();
    match value.parse::<Mime>() {
        Ok(parsed) => {
            parsed.type_() == mime::APPLICATION
                && (parsed.subtype() == mime::JSON
                    || parsed.suffix() == Some(mime::JSON))
        }
        Err(_) => value.contains("application/json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_FILENAME, REJECTION_FALLBACK};
    use rstest::rstest;
    use serde_json::json;

    fn completed(response: CapturedResponse) -> Exchange {
        Exchange::Completed(response)
    }

    fn json_blob(status: StatusCode, value: Value) -> CapturedResponse {
        CapturedResponse::binary(status, value.to_string().into_bytes())
            .with_content_type("application/json")
    }

    #[rstest]
    #[case(Some("attachment; filename=\"report.csv\""), "report.csv")]
    #[case(Some("attachment; filename=report.csv"), "report.csv")]
    #[case(None, DEFAULT_FILENAME)]
    fn binary_success_is_delivered(
        #[case] disposition: Option<&str>,
        #[case] expected: &str,
    ) {
        let mut response =
            CapturedResponse::binary(StatusCode::OK, b"a,b\n1,2\n".to_vec())
                .with_content_type("text/csv");
        response.content_disposition = disposition.map(str::to_owned);

        assert_eq!(
            classify(&completed(response)),
            UploadOutcome::FileDelivered {
                filename: expected.to_owned(),
                content_type: "text/csv".to_owned(),
                bytes: b"a,b\n1,2\n".to_vec(),
            }
        );
    }

    #[test]
    fn binary_without_content_type_defaults_to_octet_stream() {
        let outcome = classify(&completed(CapturedResponse::binary(
            StatusCode::OK,
            vec![0, 1, 2],
        )));

        match outcome {
            UploadOutcome::FileDelivered { content_type, .. } => {
                assert_eq!(content_type, "application/octet-stream")
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn structured_rejection_on_success_status() {
        let response = CapturedResponse::structured(
            StatusCode::OK,
            json!({"is_success": false, "errors": ["A", "B"]}),
        );

        assert_eq!(
            classify(&completed(response)),
            UploadOutcome::Rejected {
                messages: vec!["A".to_owned(), "B".to_owned()],
                summary: "A, B".to_owned(),
            }
        );
    }

    #[test]
    fn empty_error_list_uses_fallback_summary() {
        let response = CapturedResponse::structured(
            StatusCode::OK,
            json!({"is_success": false, "errors": []}),
        );

        assert_eq!(
            classify(&completed(response)),
            UploadOutcome::Rejected {
                messages: vec![],
                summary: REJECTION_FALLBACK.to_owned(),
            }
        );
    }

    #[test]
    fn structured_success_is_passed_through() {
        let body = json!({"is_success": true, "rows": 12});
        let response =
            CapturedResponse::structured(StatusCode::OK, body.clone());

        assert_eq!(
            classify(&completed(response)),
            UploadOutcome::Ok { data: body }
        );
    }

    #[test]
    fn json_blob_rejection_on_success_status() {
        let response = json_blob(
            StatusCode::OK,
            json!({"is_success": false, "errors": ["Missing column"]}),
        );

        assert_eq!(
            classify(&completed(response)),
            UploadOutcome::Rejected {
                messages: vec!["Missing column".to_owned()],
                summary: "Missing column".to_owned(),
            }
        );
    }

    #[test]
    fn json_blob_without_envelope_is_still_a_file() {
        let response = json_blob(StatusCode::OK, json!({"rows": []}))
            .with_disposition("attachment; filename=rows.json");

        match classify(&completed(response)) {
            UploadOutcome::FileDelivered { filename, .. } => {
                assert_eq!(filename, "rows.json")
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST)]
    #[case(StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR)]
    fn json_blob_rejection_on_error_status(#[case] status: StatusCode) {
        let response =
            json_blob(status, json!({"is_success": false, "errors": ["X"]}));

        assert_eq!(
            classify(&completed(response)),
            UploadOutcome::Rejected {
                messages: vec!["X".to_owned()],
                summary: "X".to_owned(),
            }
        );
    }

    #[test]
    fn structured_rejection_on_error_status() {
        let response = CapturedResponse::structured(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"is_success": false, "errors": ["X"]}),
        );

        assert_eq!(
            classify(&completed(response)),
            UploadOutcome::Rejected {
                messages: vec!["X".to_owned()],
                summary: "X".to_owned(),
            }
        );
    }

    #[test]
    fn structured_message_on_error_status() {
        let response = CapturedResponse::structured(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"message": "boom"}),
        );

        assert_eq!(
            classify(&completed(response)),
            UploadOutcome::transport_failed("boom")
        );
    }

    #[test]
    fn rejection_is_the_same_on_both_paths() {
        let body = json!({"is_success": false, "errors": ["X", "Y"]});
        let ok = classify(&completed(json_blob(StatusCode::OK, body.clone())));
        let err =
            classify(&completed(json_blob(StatusCode::BAD_REQUEST, body)));
        assert_eq!(ok, err);
    }

    #[rstest]
    #[case(CapturedResponse::binary(StatusCode::BAD_GATEWAY, b"<html>".to_vec())
        .with_content_type("text/html"))]
    #[case(CapturedResponse::binary(StatusCode::BAD_REQUEST, b"not json".to_vec())
        .with_content_type("application/json"))]
    #[case(CapturedResponse::binary(StatusCode::BAD_REQUEST, vec![0xff, 0xfe, 0x00])
        .with_content_type("application/json; charset=utf-8"))]
    #[case(json_blob(StatusCode::BAD_REQUEST, json!({"is_success": true})))]
    fn undecodable_error_body_is_a_transport_failure(
        #[case] response: CapturedResponse,
    ) {
        assert_eq!(
            classify(&completed(response)),
            UploadOutcome::transport_failed(TRANSPORT_FALLBACK)
        );
    }

    #[test]
    fn nested_message_becomes_summary() {
        let response = json_blob(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"message": "Database unavailable"}),
        );

        assert_eq!(
            classify(&completed(response)),
            UploadOutcome::transport_failed("Database unavailable")
        );
    }

    #[test]
    fn error_blob_without_json_type_is_not_inspected() {
        let response = CapturedResponse::binary(
            StatusCode::BAD_REQUEST,
            json!({"is_success": false, "errors": ["X"]})
                .to_string()
                .into_bytes(),
        )
        .with_content_type("text/plain");

        assert_eq!(
            classify(&completed(response)),
            UploadOutcome::transport_failed(TRANSPORT_FALLBACK)
        );
    }

    #[test]
    fn network_failure() {
        let exchange = Exchange::Failed {
            reason: "connection refused".to_owned(),
        };
        assert_eq!(
            classify(&exchange),
            UploadOutcome::transport_failed(TRANSPORT_FALLBACK)
        );
    }

    #[test]
    fn classification_is_repeatable() {
        let exchange = completed(
            CapturedResponse::binary(StatusCode::OK, b"payload".to_vec())
                .with_disposition("attachment; filename=\"x.zip\""),
        );
        assert_eq!(classify(&exchange), classify(&exchange));
    }

    #[rstest]
    #[case("application/json", true)]
    #[case("application/json; charset=utf-8", true)]
    #[case("Application/JSON", true)]
    #[case("application/problem+json", true)]
    #[case("text/csv", false)]
    #[case("application/octet-stream", false)]
    fn detects_json_content_type(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_json_content_type(value), expected);
    }
}
