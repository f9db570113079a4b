mod directory;
mod recording;
mod staged;

use std::sync::Arc;

use url::Url;

use crate::outcome::Download;
use crate::Result;

pub use directory::DirectoryPlatform;
pub use recording::RecordingPlatform;
pub use staged::StagedFile;

/// The only part of the client that touches process-wide state.
pub trait Platform: Send + Sync {
    /// Base URL that endpoint paths are appended to.
    fn resolve_base_url(&self) -> Result<Url>;

    /// Hand a downloaded file over to the user.
    fn deliver_download(&self, download: &Download) -> Result<()>;
}

impl<P: Platform + ?Sized> Platform for Arc<P> {
    fn resolve_base_url(&self) -> Result<Url> {
        (**self).resolve_base_url()
    }

    fn deliver_download(&self, download: &Download) -> Result<()> {
        (**self).deliver_download(download)
    }
}

impl<P: Platform + ?Sized> Platform for &P {
    fn resolve_base_url(&self) -> Result<Url> {
        (**self).resolve_base_url()
    }

    fn deliver_download(&self, download: &Download) -> Result<()> {
        (**self).deliver_download(download)
    }
}
