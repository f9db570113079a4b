use std::path::PathBuf;

use report_upload::{PaymentExtractForm, UploadOutcome};

use super::Transport;
use crate::error::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(
    name = "payment-extract",
    about = "Process a payment extract workbook (.xlsx)"
)]
pub struct PaymentExtract {
    #[clap(value_parser, help = "The Excel file to process")]
    path: PathBuf,
}

impl PaymentExtract {
    pub async fn run(
        &self,
        transport: &Transport,
    ) -> Result<UploadOutcome, AppError> {
        let form = PaymentExtractForm::from_path(&self.path)?;

        println!("Processing {}...", self.path.display());
        Ok(transport.upload(form).await?)
    }
}
