use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, trace};
use url::Url;

use super::{Platform, StagedFile};
use crate::config::BaseUrlConfig;
use crate::outcome::Download;
use crate::{Result, UploadError, DEFAULT_FILENAME};

/// Saves downloads into a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryPlatform {
    base_url: BaseUrlConfig,
    out_dir: PathBuf,
}

impl DirectoryPlatform {
    pub fn new<P: Into<PathBuf>>(base_url: BaseUrlConfig, out_dir: P) -> Self {
        Self {
            base_url,
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Where a download with the given suggested name ends up.
    pub fn destination(&self, filename: &str) -> PathBuf {
        self.out_dir.join(safe_filename(filename))
    }
}

impl Platform for DirectoryPlatform {
    fn resolve_base_url(&self) -> Result<Url> {
        self.base_url.resolve()
    }

    fn deliver_download(&self, download: &Download) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let dest = self.destination(&download.filename);
        trace!(
            "Staging {} bytes of {} for {}",
            download.bytes.len(),
            download.content_type,
            dest.display()
        );

        let staged = StagedFile::create_in(&self.out_dir)?;
        (&staged).write_all(&download.bytes)?;
        staged.persist(&dest).map_err(|e| {
            UploadError::Delivery(dest.display().to_string(), e.to_string())
        })?;

        debug!("Saved download to {}", dest.display());
        Ok(())
    }
}

/// Keep only the last path component of a server-suggested name.
fn safe_filename(filename: &str) -> String {
    let name = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    match name {
        "" | "." | ".." => DEFAULT_FILENAME.to_owned(),
        name if StagedFile::is_staging_name(name) => {
            format!("{DEFAULT_FILENAME}-{name}")
        }
        name => name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn download(filename: &str, bytes: &[u8]) -> Download {
        Download {
            filename: filename.to_owned(),
            content_type: "text/csv".to_owned(),
            bytes: bytes.to_vec(),
        }
    }

    #[rstest]
    #[case("report.csv", "report.csv")]
    #[case("../../etc/passwd", "passwd")]
    #[case("C:\\temp\\out.zip", "out.zip")]
    #[case("reports/", DEFAULT_FILENAME)]
    #[case("..", DEFAULT_FILENAME)]
    fn sanitizes_names(#[case] filename: &str, #[case] expected: &str) {
        assert_eq!(safe_filename(filename), expected);
    }

    #[test]
    fn writes_into_out_dir() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("downloads");
        let platform =
            DirectoryPlatform::new(BaseUrlConfig::default(), &out_dir);

        platform
            .deliver_download(&download("aging.csv", b"customer,days"))
            .unwrap();

        assert_eq!(
            fs::read(out_dir.join("aging.csv")).unwrap(),
            b"customer,days"
        );
        let entries: Vec<_> = fs::read_dir(&out_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn overwrites_previous_download() {
        let dir = TempDir::new().unwrap();
        let platform =
            DirectoryPlatform::new(BaseUrlConfig::default(), dir.path());

        platform.deliver_download(&download("out.csv", b"old")).unwrap();
        platform.deliver_download(&download("out.csv", b"new")).unwrap();

        assert_eq!(fs::read(dir.path().join("out.csv")).unwrap(), b"new");
    }

    #[test]
    fn failed_rename_leaves_no_staging_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory in the way makes the rename fail.
        let blocker = dir.path().join("out.csv");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), b"x").unwrap();

        let platform =
            DirectoryPlatform::new(BaseUrlConfig::default(), dir.path());
        let result = platform.deliver_download(&download("out.csv", b"data"));

        assert!(matches!(result, Err(UploadError::Delivery(_, _))));
        let leftovers: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(leftovers, vec!["out.csv".to_owned()]);
    }

    #[test]
    fn resolves_configured_base_url() {
        let platform =
            DirectoryPlatform::new(BaseUrlConfig::default(), ".");
        assert_eq!(
            platform.resolve_base_url().unwrap().as_str(),
            "http://127.0.0.1/api"
        );
    }
}
