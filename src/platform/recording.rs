use std::sync::Mutex;

use url::Url;

use super::Platform;
use crate::outcome::Download;
use crate::{Result, UploadError};

/// Keeps deliveries in memory. Useful for embedding and tests.
#[derive(Debug)]
pub struct RecordingPlatform {
    base_url: Url,
    deliveries: Mutex<Vec<Download>>,
    refuse: bool,
}

impl RecordingPlatform {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            deliveries: Mutex::new(Vec::new()),
            refuse: false,
        }
    }

    /// A platform whose every delivery fails.
    pub fn refusing(base_url: Url) -> Self {
        Self {
            refuse: true,
            ..Self::new(base_url)
        }
    }

    pub fn deliveries(&self) -> Vec<Download> {
        self.deliveries
            .lock()
            .map(|deliveries| deliveries.clone())
            .unwrap_or_default()
    }
}

impl Platform for RecordingPlatform {
    fn resolve_base_url(&self) -> Result<Url> {
        Ok(self.base_url.clone())
    }

    fn deliver_download(&self, download: &Download) -> Result<()> {
        if self.refuse {
            return Err(UploadError::Delivery(
                download.filename.clone(),
                "delivery refused".to_owned(),
            ));
        }

        self.deliveries
            .lock()
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .push(download.clone());
        Ok(())
    }
}
