use report_upload::UploadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Couldn't load config: {0}")]
    ConfigLoadError(String),

    #[error(transparent)]
    UploadError(#[from] UploadError),
}
