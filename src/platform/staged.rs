use std::fs::{self, File};
use std::io::{Result, Write};
use std::path::{Path, PathBuf};

const STAGING_PREFIX: &str = ".partial-";

/// Temporary file holding a download until it is moved into place.
///
/// The staging path is removed on drop whether or not [`persist`] ran, so a
/// failed rename never leaves a partial file behind.
///
/// [`persist`]: StagedFile::persist
pub struct StagedFile {
    file: File,
    path: PathBuf,
}

impl StagedFile {
    pub fn create_in(dir: impl AsRef<Path>) -> Result<Self> {
        let suffix: String = std::iter::repeat_with(fastrand::alphanumeric)
            .take(10)
            .collect();
        let path = dir
            .as_ref()
            .join(format!("{STAGING_PREFIX}{suffix}"));
        let file = File::create(&path)?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn persist(&self, dest: impl AsRef<Path>) -> Result<()> {
        (&self.file).flush()?;
        self.file.sync_all()?;
        fs::rename(&self.path, dest)
    }

    pub fn is_staging_name(name: &str) -> bool {
        name.starts_with(STAGING_PREFIX)
    }
}

impl std::io::Write for &StagedFile {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (&self.file).write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (&self.file).flush()
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let staged = StagedFile::create_in(dir.path()).unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn persisted_file_survives_drop() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.csv");
        {
            let staged = StagedFile::create_in(dir.path()).unwrap();
            (&staged).write_all(b"a,b").unwrap();
            staged.persist(&dest).unwrap();
        }

        assert_eq!(fs::read(&dest).unwrap(), b"a,b");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
