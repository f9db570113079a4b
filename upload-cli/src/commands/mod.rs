use clap::Subcommand;
use report_upload::{DirectoryPlatform, UploadOutcome, UploadTransport};

use crate::error::AppError;

mod aging_report;
mod bank_statement;
mod inventory;
mod payment_extract;

pub type Transport = UploadTransport<DirectoryPlatform>;

#[derive(Debug, Subcommand)]
pub enum Commands {
    Inventory(inventory::Inventory),
    AgingReport(aging_report::AgingReport),
    PaymentExtract(payment_extract::PaymentExtract),
    BankStatement(bank_statement::BankStatement),
}

impl Commands {
    pub async fn run(
        &self,
        transport: &Transport,
    ) -> Result<UploadOutcome, AppError> {
        match self {
            Commands::Inventory(cmd) => cmd.run(transport).await,
            Commands::AgingReport(cmd) => cmd.run(transport).await,
            Commands::PaymentExtract(cmd) => cmd.run(transport).await,
            Commands::BankStatement(cmd) => cmd.run(transport).await,
        }
    }
}
