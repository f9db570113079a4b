use std::path::PathBuf;

use report_upload::{InventoryForm, UploadOutcome};

use super::Transport;
use crate::error::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "inventory", about = "Upload inventory TXT and CSV files")]
pub struct Inventory {
    #[clap(long = "txt", num_args = 1.., help = "Inventory TXT exports")]
    txt_files: Vec<PathBuf>,
    #[clap(long = "csv", num_args = 1.., help = "Inventory CSV files")]
    csv_files: Vec<PathBuf>,
}

impl Inventory {
    pub async fn run(
        &self,
        transport: &Transport,
    ) -> Result<UploadOutcome, AppError> {
        let form = InventoryForm::from_paths(&self.txt_files, &self.csv_files)?;

        println!(
            "Uploading {} TXT and {} CSV files...",
            form.txt_files.len(),
            form.csv_files.len()
        );
        Ok(transport.upload(form).await?)
    }
}
