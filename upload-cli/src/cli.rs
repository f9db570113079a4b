use std::path::PathBuf;

use clap::Parser;
use report_upload::{ApiMount, Config, ResponseMode};
use url::Url;

use crate::commands::Commands;
use crate::error::AppError;

#[derive(Parser, Debug)]
#[clap(name = "report-upload-cli")]
#[clap(
    about = "Upload reports for processing and save the results",
    long_about = None
)]
pub struct Cli {
    #[clap(long, global = true, help = "JSON config file")]
    pub config: Option<PathBuf>,

    #[clap(
        long,
        global = true,
        help = "API base URL, takes precedence over everything else"
    )]
    pub base_url: Option<Url>,

    #[clap(long, global = true, help = "Origin the API is served from")]
    pub origin: Option<Url>,

    #[clap(
        long,
        global = true,
        conflicts_with = "api_prefix",
        help = "Reach the API on this port of the origin host"
    )]
    pub api_port: Option<u16>,

    #[clap(
        long,
        global = true,
        help = "Path prefix of the API below the origin (default /api)"
    )]
    pub api_prefix: Option<String>,

    #[clap(
        short,
        long,
        global = true,
        help = "Directory returned files are saved to"
    )]
    pub out_dir: Option<PathBuf>,

    #[clap(long, global = true, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[clap(
        long,
        global = true,
        help = "Read JSON responses as data instead of files"
    )]
    pub json: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Config file values, overridden by whatever was given on the command
    /// line.
    pub fn config(&self) -> Result<Config, AppError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path).map_err(|e| {
                AppError::ConfigLoadError(format!("{}: {}", path.display(), e))
            })?,
            None => Config::default(),
        };

        if let Some(url) = &self.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(origin) = &self.origin {
            config.page_origin = Some(origin.clone());
        }
        if let Some(port) = self.api_port {
            config.api_mount = ApiMount::Port(port);
        }
        if let Some(prefix) = &self.api_prefix {
            config.api_mount = ApiMount::Prefix(prefix.clone());
        }
        if let Some(out_dir) = &self.out_dir {
            config.out_dir = Some(out_dir.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
        if self.json {
            config.response_mode = ResponseMode::Json;
        }

        Ok(config)
    }
}
