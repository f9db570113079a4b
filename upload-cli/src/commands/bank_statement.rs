use std::path::PathBuf;

use report_upload::{BankStatementForm, UploadOutcome};

use super::Transport;
use crate::error::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "bank-statement", about = "Process a bank statement (.csv)")]
pub struct BankStatement {
    #[clap(value_parser, help = "The CSV statement to process")]
    path: PathBuf,
}

impl BankStatement {
    pub async fn run(
        &self,
        transport: &Transport,
    ) -> Result<UploadOutcome, AppError> {
        let form = BankStatementForm::from_path(&self.path)?;

        println!("Processing {}...", self.path.display());
        Ok(transport.upload(form).await?)
    }
}
