use std::path::PathBuf;

use chrono::NaiveDate;
use report_upload::{AgingReportForm, UploadOutcome};

use super::Transport;
use crate::error::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(
    name = "aging-report",
    about = "Compute an aging report from data files and a mapping file"
)]
pub struct AgingReport {
    #[clap(long = "data", num_args = 1.., help = "Data CSV files")]
    data_files: Vec<PathBuf>,
    #[clap(long = "mapping", help = "Mapping CSV file")]
    mapping_file: PathBuf,
    #[clap(
        long = "date",
        value_parser = parse_date,
        help = "Report date as YYYY-MM-DD, defaults to today"
    )]
    report_date: Option<NaiveDate>,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    AgingReportForm::parse_date(value).map_err(|e| e.to_string())
}

impl AgingReport {
    pub async fn run(
        &self,
        transport: &Transport,
    ) -> Result<UploadOutcome, AppError> {
        let mut form = AgingReportForm::from_paths(
            &self.data_files,
            self.mapping_file.clone(),
        )?;
        if let Some(date) = self.report_date {
            form = form.report_date(date);
        }

        println!(
            "Uploading {} data files for {}...",
            form.data_files.len(),
            form.report_date
        );
        Ok(transport.upload(form).await?)
    }
}
