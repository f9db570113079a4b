use std::path::Path;

use super::{require_extension, UploadForm};
use crate::request::{FilePart, UploadRequest};
use crate::Result;

const CSV_FILE_FIELD: &str = "csv_file";

/// Bank statement: a single CSV export.
#[derive(Debug, Clone)]
pub struct BankStatementForm {
    pub csv_file: FilePart,
}

impl BankStatementForm {
    pub fn new(csv_file: FilePart) -> Self {
        Self { csv_file }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(FilePart::from_path(path)?))
    }
}

impl UploadForm for BankStatementForm {
    const ENDPOINT: &'static str = "/bank-statement/process";

    fn into_request(self) -> Result<UploadRequest> {
        require_extension(
            &self.csv_file,
            "csv",
            "Please select a CSV file (.csv)",
        )?;

        Ok(UploadRequest::builder()
            .file(CSV_FILE_FIELD, self.csv_file)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UploadError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reads_statement_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("march.csv");
        fs::write(&path, "date,amount\n2024-03-01,10.00\n").unwrap();

        let request = BankStatementForm::from_path(&path)
            .unwrap()
            .into_request()
            .unwrap();
        assert_eq!(request.file_count(), 1);
        assert_eq!(request.names().next(), Some("csv_file"));
    }

    #[test]
    fn rejects_non_csv() {
        let form = BankStatementForm::new(FilePart::new(
            "march.pdf",
            mime::APPLICATION_PDF,
            vec![],
        ));
        assert!(matches!(form.into_request(), Err(UploadError::Form(_))));
    }
}
