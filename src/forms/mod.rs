//! The four submissions offered by the report processing backend.
//!
//! Each form knows its endpoint and field names and checks that the files it
//! needs are present before a request is built.

mod aging_report;
mod bank_statement;
mod inventory;
mod payment_extract;

use std::path::Path;

pub use aging_report::AgingReportForm;
pub use bank_statement::BankStatementForm;
pub use inventory::InventoryForm;
pub use payment_extract::PaymentExtractForm;

use crate::request::{FilePart, UploadRequest};
use crate::{Result, UploadError};

pub trait UploadForm {
    /// Endpoint path, appended to the resolved base URL.
    const ENDPOINT: &'static str;

    fn into_request(self) -> Result<UploadRequest>;
}

fn read_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<FilePart>> {
    paths.iter().map(FilePart::from_path).collect()
}

fn require_extension(
    file: &FilePart,
    extension: &str,
    message: &str,
) -> Result<()> {
    match file.extension() {
        Some(ext) if ext == extension => Ok(()),
        _ => Err(UploadError::Form(message.to_owned())),
    }
}
