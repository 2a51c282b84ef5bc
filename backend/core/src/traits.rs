use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;
use crate::event::{SkipReason, UploadOutcome};
use crate::types::{FetchQuery, MediaItem};

/// Byte progress callback: `(bytes_done, bytes_total)`.
pub type ProgressFn<'a> = &'a (dyn Fn(u64, u64) + Send + Sync);

/// Lazy, ordered stream of items produced by a source.
pub type ItemStream<'a> = BoxStream<'a, Result<MediaItem>>;

/// A remote collection that media items are fetched from.
///
/// One pass per run; the returned stream is not restartable.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Resolve the source and start fetching. Errors here are setup
    /// failures; errors yielded by the stream interrupt the pass.
    async fn fetch(&self, query: &FetchQuery) -> Result<ItemStream<'_>>;
}

/// Fetches an item's bytes into a local directory.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `item` into `dest_dir`, returning the local path.
    async fn download(
        &self,
        item: &MediaItem,
        dest_dir: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<PathBuf>;
}

/// Pushes a downloaded file to the destination.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(
        &self,
        local_path: &Path,
        item: &MediaItem,
        dest_folder: &str,
        progress: ProgressFn<'_>,
    ) -> Result<UploadOutcome>;
}

/// Read access to what is already stored at the destination.
#[async_trait]
pub trait DestinationStore: Send + Sync {
    /// Names of every file under `folder`, across all backing locations.
    async fn list_all(&self, folder: &str) -> Result<Vec<String>>;

    /// Whether `full_path` exists in any backing location.
    async fn exists(&self, full_path: &str) -> Result<bool>;
}

/// Snapshot of known content fingerprints.
#[async_trait]
pub trait DuplicateIndex: Send + Sync {
    /// Load the snapshot, returning the number of known fingerprints.
    async fn load(&self) -> Result<usize>;

    fn is_duplicate(&self, fingerprint: &str) -> bool;

    fn add(&self, fingerprint: &str);
}

/// Receives per-item pipeline events.
///
/// Every hook defaults to a no-op. Hooks run inline on the pipeline's task,
/// so they must return quickly; a panicking hook is contained by the caller.
pub trait ProgressSink: Send + Sync {
    fn on_start(&self, _item: &MediaItem) {}

    fn on_download(&self, _item: &MediaItem) {}

    fn on_upload(&self, _item: &MediaItem, _remote_id: &str) {}

    fn on_skip(&self, _item: &MediaItem, _reason: SkipReason) {}

    fn on_error(&self, _item: &MediaItem, _message: &str) {}

    fn on_download_progress(&self, _done: u64, _total: u64) {}

    fn on_upload_progress(&self, _done: u64, _total: u64) {}
}

/// A sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ProgressSink for NoopSink {}
