use clap::Parser;
use log::debug;
use report_upload::{
    DirectoryPlatform, UploadOutcome, UploadTransport, UNEXPECTED_FAILURE,
};

use crate::cli::Cli;
use crate::error::AppError;

mod cli;
mod commands;
mod error;

const EXIT_FAILED: i32 = 1;
const EXIT_USAGE: i32 = 2;

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Cli::parse();

    let code = match run(&args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e);
            EXIT_USAGE
        }
    };
    std::process::exit(code);
}

async fn run(args: &Cli) -> Result<i32, AppError> {
    let config = args.config()?;
    debug!("Using {:?}", config);
    let transport = config.transport()?;

    let outcome = args.command.run(&transport).await?;
    Ok(report(&transport, &outcome))
}

fn report(
    transport: &UploadTransport<DirectoryPlatform>,
    outcome: &UploadOutcome,
) -> i32 {
    if let Some(data) = outcome.data() {
        if let UploadOutcome::FileDelivered { filename, bytes, .. } = outcome {
            let dest = transport.platform().destination(filename);
            eprintln!("Saved {} ({} bytes)", dest.display(), bytes.len());
        }
        match serde_json::to_string_pretty(&data) {
            Ok(text) => println!("{}", text),
            Err(_) => println!("{}", data),
        }
        return 0;
    }

    let summary = outcome.error().unwrap_or(UNEXPECTED_FAILURE);
    match outcome {
        UploadOutcome::Rejected { .. } => eprintln!("Rejected: {}", summary),
        _ => eprintln!("{}", summary),
    }
    let messages = outcome.error_messages();
    if messages.len() > 1 {
        messages
            .iter()
            .for_each(|message| eprintln!("\t- {}", message));
    }
    EXIT_FAILED
}
