use std::path::Path;

use super::{read_all, UploadForm};
use crate::request::{FilePart, UploadRequest};
use crate::{Result, UploadError};

const TXT_FILES_FIELD: &str = "txt_files";
const CSV_FILES_FIELD: &str = "csv_files";

/// Inventory counts: TXT exports plus CSV files.
#[derive(Debug, Clone, Default)]
pub struct InventoryForm {
    pub txt_files: Vec<FilePart>,
    pub csv_files: Vec<FilePart>,
}

impl InventoryForm {
    pub fn new(txt_files: Vec<FilePart>, csv_files: Vec<FilePart>) -> Self {
        Self {
            txt_files,
            csv_files,
        }
    }

    pub fn from_paths<P: AsRef<Path>>(txt: &[P], csv: &[P]) -> Result<Self> {
        Ok(Self::new(read_all(txt)?, read_all(csv)?))
    }
}

impl UploadForm for InventoryForm {
    const ENDPOINT: &'static str = "/inventory/uploadfiles/";

    fn into_request(self) -> Result<UploadRequest> {
        if self.txt_files.is_empty() {
            return Err(UploadError::Form(
                "Please select at least one TXT file".to_owned(),
            ));
        }

        Ok(UploadRequest::from_file_groups(
            self.txt_files,
            TXT_FILES_FIELD,
            self.csv_files,
            CSV_FILES_FIELD,
            &[],
        ))
    }
}
