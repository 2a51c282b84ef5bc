use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use tgup_core::MediaItem;

/// A downloaded file awaiting upload.
///
/// Removed by `discard`, or on drop if the owner never got that far
/// (cancelled run, panicking collaborator).
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    armed: bool,
}

impl StagedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), armed: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file. A file that is already gone is not an error.
    pub async fn discard(mut self) {
        self.armed = false;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "Removed staged file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to remove staged file")
            }
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = std::fs::remove_file(&self.path) {
                if e.kind() != ErrorKind::NotFound {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Failed to remove abandoned staged file"
                    );
                }
            }
        }
    }
}

/// An item paired with its downloaded bytes, owned by the pipeline from
/// enqueue until the upload attempt finishes.
#[derive(Debug)]
pub struct PendingTransfer {
    pub item: MediaItem,
    pub file: StagedFile,
}

impl PendingTransfer {
    pub fn new(item: MediaItem, path: impl Into<PathBuf>) -> Self {
        Self { item, file: StagedFile::new(path) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn discard_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        std::fs::write(&path, b"data").unwrap();

        StagedFile::new(&path).discard().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn discard_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        StagedFile::new(dir.path().join("never-written")).discard().await;
    }

    #[test]
    fn drop_removes_abandoned_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.bin");
        std::fs::write(&path, b"data").unwrap();

        let pending = PendingTransfer::new(crate::testing::item(1), &path);
        assert_eq!(pending.file.path(), path.as_path());
        drop(pending);
        assert!(!path.exists());
    }
}
