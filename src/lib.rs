//! Multipart upload client for the report processing backend.
//!
//! A submission is one `POST` of an [`UploadRequest`] to an endpoint below
//! the resolved base URL. The response is classified into an
//! [`UploadOutcome`]: a JSON payload, a delivered file, a business-rule
//! rejection, or a transport failure. Submitting never returns an error;
//! every failure ends up in the outcome.
//!
//! Everything touching process-wide state (base URL resolution, writing
//! downloads) sits behind the [`Platform`] trait.

pub mod classify;
pub mod config;
pub mod disposition;
pub mod envelope;
mod errors;
pub mod forms;
pub mod outcome;
pub mod platform;
pub mod request;
pub mod transport;

pub use classify::{classify, CapturedResponse, Exchange, ResponseBody};
pub use config::{ApiMount, BaseUrlConfig, Config};
pub use errors::{Result, UploadError};
pub use forms::{
    AgingReportForm, BankStatementForm, InventoryForm, PaymentExtractForm,
    UploadForm,
};
pub use outcome::{Download, UploadOutcome};
pub use platform::{DirectoryPlatform, Platform, RecordingPlatform};
pub use request::{FilePart, Part, PartValue, UploadRequest};
pub use transport::{ResponseMode, UploadTransport};

pub const DEFAULT_FILENAME: &str = "downloaded_file";
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub const REJECTION_FALLBACK: &str = "Error processing files";
pub const TRANSPORT_FALLBACK: &str = "Error uploading files";
pub const UNEXPECTED_FAILURE: &str = "An unexpected error occurred";
pub const DELIVERED_MESSAGE: &str = "File downloaded successfully";

pub const DEFAULT_API_PREFIX: &str = "/api";
pub const LEGACY_API_PORT: u16 = 8000;
pub const FALLBACK_HOST: &str = "127.0.0.1";
