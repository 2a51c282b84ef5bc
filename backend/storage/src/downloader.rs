use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, warn};

use tgup_core::{Downloader, MediaItem, ProgressFn, Result, TransferError};

/// Read size for copies and progress reporting.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Copies item bytes out of a source folder.
#[derive(Debug, Clone)]
pub struct FileDownloader {
    source_dir: PathBuf,
}

impl FileDownloader {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self { source_dir: source_dir.into() }
    }

    fn source_path(&self, item: &MediaItem) -> Result<PathBuf> {
        let name = item.filename.as_deref().ok_or_else(|| {
            TransferError::Download(format!("message {} has no file", item.message_id))
        })?;
        Ok(self.source_dir.join(name))
    }
}

#[async_trait]
impl Downloader for FileDownloader {
    async fn download(
        &self,
        item: &MediaItem,
        dest_dir: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<PathBuf> {
        let from = self.source_path(item)?;
        tokio::fs::create_dir_all(dest_dir).await?;
        let to = dest_dir.join(format!(
            "{}_{}_{}",
            item.chat_id,
            item.message_id,
            item.destination_name()
        ));

        let partial = PartialFile::new(&to);
        match copy_with_progress(&from, &to, item.file_size, progress).await {
            Ok(bytes) => {
                partial.keep();
                debug!(
                    message_id = item.message_id,
                    bytes,
                    path = %to.display(),
                    "Copied to staging"
                );
                Ok(to)
            }
            Err(e) => Err(TransferError::Download(format!("{}: {e}", from.display()))),
        }
    }
}

/// Removes a file on drop unless `keep` was called.
///
/// Covers both failed copies and copies abandoned mid-way by a dropped future.
pub(crate) struct PartialFile<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> PartialFile<'a> {
    pub(crate) fn new(path: &'a Path) -> Self {
        Self { path, armed: true }
    }

    pub(crate) fn keep(mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_file(self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to remove partial file");
            }
        }
    }
}

/// Chunked copy reporting `(bytes_done, total)` after every chunk.
///
/// `expected` is used as the total when the source length is unknown.
pub(crate) async fn copy_with_progress(
    from: &Path,
    to: &Path,
    expected: u64,
    progress: ProgressFn<'_>,
) -> std::io::Result<u64> {
    let mut reader = File::open(from).await?;
    let total = match reader.metadata().await?.len() {
        0 => expected,
        len => len,
    };
    let mut writer = File::create(to).await?;

    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut done = 0u64;
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n]).await?;
        done += n as u64;
        progress(done, total);
    }
    writer.flush().await?;
    Ok(done)
}
