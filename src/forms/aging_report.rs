use std::path::Path;

use chrono::{NaiveDate, Utc};

use super::{read_all, UploadForm};
use crate::request::{FilePart, UploadRequest};
use crate::{Result, UploadError};

const DATA_FILES_FIELD: &str = "data_files";
const MAPPING_FILE_FIELD: &str = "mapping_file";
const REPORT_DATE_FIELD: &str = "report_date";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Aging report: several data CSVs, one mapping CSV and the date the ages
/// are computed against.
#[derive(Debug, Clone)]
pub struct AgingReportForm {
    pub data_files: Vec<FilePart>,
    pub mapping_file: Option<FilePart>,
    pub report_date: NaiveDate,
}

impl AgingReportForm {
    /// Report date defaults to today (UTC).
    pub fn new(data_files: Vec<FilePart>, mapping_file: FilePart) -> Self {
        Self {
            data_files,
            mapping_file: Some(mapping_file),
            report_date: Utc::now().date_naive(),
        }
    }

    pub fn from_paths<P: AsRef<Path>>(data: &[P], mapping: P) -> Result<Self> {
        Ok(Self::new(read_all(data)?, FilePart::from_path(mapping)?))
    }

    pub fn report_date(mut self, date: NaiveDate) -> Self {
        self.report_date = date;
        self
    }

    pub fn parse_date(value: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
            UploadError::Form(format!(
                "Report date must look like YYYY-MM-DD, got {value}"
            ))
        })
    }
}

impl UploadForm for AgingReportForm {
    const ENDPOINT: &'static str = "/aging-reports/process";

    fn into_request(self) -> Result<UploadRequest> {
        if self.data_files.is_empty() {
            return Err(UploadError::Form(
                "Please select at least one data file".to_owned(),
            ));
        }
        let mapping_file = self.mapping_file.ok_or_else(|| {
            UploadError::Form("Please select a mapping file".to_owned())
        })?;

        let report_date = self.report_date.format(DATE_FORMAT).to_string();
        Ok(UploadRequest::from_file_groups(
            self.data_files,
            DATA_FILES_FIELD,
            Some(mapping_file),
            MAPPING_FILE_FIELD,
            &[(REPORT_DATE_FIELD, Some(report_date))],
        ))
    }
}
