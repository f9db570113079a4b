use std::path::Path;

use super::{require_extension, UploadForm};
use crate::request::{FilePart, UploadRequest};
use crate::Result;

const EXCEL_FILE_FIELD: &str = "excel_file";

/// Payment extract: a single `.xlsx` workbook. The backend answers with a
/// ZIP archive.
#[derive(Debug, Clone)]
pub struct PaymentExtractForm {
    pub excel_file: FilePart,
}

impl PaymentExtractForm {
    pub fn new(excel_file: FilePart) -> Self {
        Self { excel_file }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(FilePart::from_path(path)?))
    }
}

impl UploadForm for PaymentExtractForm {
    const ENDPOINT: &'static str = "/payment-extract/process/";

    fn into_request(self) -> Result<UploadRequest> {
        require_extension(
            &self.excel_file,
            "xlsx",
            "Please select an Excel file (.xlsx)",
        )?;

        Ok(UploadRequest::builder()
            .file(EXCEL_FILE_FIELD, self.excel_file)
            .build())
    }
}
