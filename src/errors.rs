use std::str::Utf8Error;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, UploadError>;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Missing file: {0}")]
    MissingFile(String),
    #[error("Invalid form: {0}")]
    Form(String),
    #[error("Delivery error: {0} {1}")]
    Delivery(String, String),
    #[error("Parsing error")]
    Parse,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<Utf8Error> for UploadError {
    fn from(_: Utf8Error) -> Self {
        Self::Parse
    }
}

impl From<serde_json::Error> for UploadError {
    fn from(_: serde_json::Error) -> Self {
        Self::Parse
    }
}
