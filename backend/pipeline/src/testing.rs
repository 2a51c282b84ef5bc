//! Fake collaborators for pipeline tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures::StreamExt;

use tgup_core::{
    DestinationStore, DuplicateIndex, Downloader, FetchQuery, ItemStream, MediaItem,
    MediaKind, MediaSource, ProgressFn, ProgressSink, Result, SkipReason, TransferError,
    UploadOutcome, Uploader,
};

/// A 1 MB video named `test{id}.mp4` with fingerprint `doc{id}`.
pub(crate) fn item(id: i64) -> MediaItem {
    MediaItem::new(123, id, Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(), MediaKind::Video)
        .with_file_size(1_000_000)
        .with_filename(format!("test{id}.mp4"))
        .with_fingerprint(format!("doc{id}"))
}

pub(crate) fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[derive(Default)]
pub(crate) struct VecSource {
    items: Vec<MediaItem>,
    interrupt_after: Option<usize>,
    fail_setup: bool,
}

impl VecSource {
    pub(crate) fn new(items: impl IntoIterator<Item = MediaItem>) -> Self {
        Self { items: items.into_iter().collect(), ..Default::default() }
    }

    pub(crate) fn interrupted_after(mut self, n: usize) -> Self {
        self.interrupt_after = Some(n);
        self
    }

    pub(crate) fn failing_setup(mut self) -> Self {
        self.fail_setup = true;
        self
    }
}

#[async_trait]
impl MediaSource for VecSource {
    async fn fetch(&self, query: &FetchQuery) -> Result<ItemStream<'_>> {
        if self.fail_setup {
            return Err(TransferError::Source(format!("cannot resolve {}", query.source)));
        }
        let mut items: Vec<Result<MediaItem>> = self
            .items
            .iter()
            .filter(|m| query.filter.matches(m.kind))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .map(Ok)
            .collect();
        if let Some(n) = self.interrupt_after {
            items.truncate(n);
            items.push(Err(TransferError::Source("connection reset".into())));
        }
        Ok(futures::stream::iter(items).boxed())
    }
}

#[derive(Default)]
pub(crate) struct FakeDownloader {
    delay: Duration,
    delays: HashMap<i64, Duration>,
    failures: HashSet<i64>,
    calls: Mutex<Vec<i64>>,
}

impl FakeDownloader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn with_delay_for(mut self, message_id: i64, delay: Duration) -> Self {
        self.delays.insert(message_id, delay);
        self
    }

    pub(crate) fn failing_on(mut self, message_id: i64) -> Self {
        self.failures.insert(message_id);
        self
    }

    pub(crate) fn calls(&self) -> Vec<i64> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Downloader for FakeDownloader {
    async fn download(
        &self,
        item: &MediaItem,
        dest_dir: &Path,
        progress: ProgressFn<'_>,
    ) -> Result<PathBuf> {
        self.calls.lock().unwrap().push(item.message_id);
        let delay = self.delays.get(&item.message_id).copied().unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.failures.contains(&item.message_id) {
            return Err(TransferError::Download("network unreachable".into()));
        }
        std::fs::create_dir_all(dest_dir)?;
        let path = dest_dir.join(format!("{}_{}", item.message_id, item.destination_name()));
        std::fs::write(&path, b"media bytes")?;
        progress(item.file_size, item.file_size);
        Ok(path)
    }
}

#[derive(Default)]
pub(crate) struct FakeUploader {
    delay: Duration,
    errors: HashSet<i64>,
    rejections: HashSet<i64>,
    staging_dir: Option<PathBuf>,
    uploaded: Mutex<Vec<i64>>,
    file_present: Mutex<Vec<bool>>,
    max_staged: AtomicUsize,
}

impl FakeUploader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn erroring_on(mut self, message_id: i64) -> Self {
        self.errors.insert(message_id);
        self
    }

    pub(crate) fn rejecting(mut self, message_id: i64) -> Self {
        self.rejections.insert(message_id);
        self
    }

    /// Track how many staged files exist whenever an upload starts.
    pub(crate) fn watching(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    /// Message ids in the order uploads were attempted.
    pub(crate) fn attempts(&self) -> Vec<i64> {
        self.uploaded.lock().unwrap().clone()
    }

    pub(crate) fn saw_every_file(&self) -> bool {
        self.file_present.lock().unwrap().iter().all(|present| *present)
    }

    pub(crate) fn max_staged(&self) -> usize {
        self.max_staged.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Uploader for FakeUploader {
    async fn upload(
        &self,
        local_path: &Path,
        item: &MediaItem,
        _dest_folder: &str,
        progress: ProgressFn<'_>,
    ) -> Result<UploadOutcome> {
        self.uploaded.lock().unwrap().push(item.message_id);
        self.file_present.lock().unwrap().push(local_path.exists());
        if let Some(dir) = &self.staging_dir {
            self.max_staged.fetch_max(count_files(dir), Ordering::SeqCst);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.errors.contains(&item.message_id) {
            return Err(TransferError::Upload("connection dropped".into()));
        }
        if self.rejections.contains(&item.message_id) {
            return Ok(UploadOutcome::Rejected { reason: "storage quota exceeded".into() });
        }
        progress(item.file_size, item.file_size);
        Ok(UploadOutcome::Uploaded { remote_id: format!("remote-{}", item.message_id) })
    }
}

#[derive(Default)]
pub(crate) struct FakeStore {
    listing: Vec<String>,
    remote: HashSet<String>,
    fail_listing: bool,
    fail_exists: bool,
    exists_calls: AtomicUsize,
}

impl FakeStore {
    pub(crate) fn with_listing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { listing: names.into_iter().map(Into::into).collect(), ..Default::default() }
    }

    pub(crate) fn with_remote<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remote.extend(paths.into_iter().map(Into::into));
        self
    }

    pub(crate) fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub(crate) fn failing_exists(mut self) -> Self {
        self.fail_exists = true;
        self
    }

    pub(crate) fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DestinationStore for FakeStore {
    async fn list_all(&self, _folder: &str) -> Result<Vec<String>> {
        if self.fail_listing {
            return Err(TransferError::Store("account locked".into()));
        }
        Ok(self.listing.clone())
    }

    async fn exists(&self, full_path: &str) -> Result<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_exists {
            return Err(TransferError::Store("timeout".into()));
        }
        Ok(self.remote.contains(full_path))
    }
}

#[derive(Default)]
pub(crate) struct MemoryIndex {
    ids: Mutex<HashSet<String>>,
    fail_load: bool,
}

impl MemoryIndex {
    pub(crate) fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { ids: Mutex::new(ids.into_iter().map(Into::into).collect()), fail_load: false }
    }

    pub(crate) fn failing_load() -> Self {
        Self { fail_load: true, ..Default::default() }
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.ids.lock().unwrap().contains(id)
    }
}

#[async_trait]
impl DuplicateIndex for MemoryIndex {
    async fn load(&self) -> Result<usize> {
        if self.fail_load {
            return Err(TransferError::DuplicateIndex("index service unavailable".into()));
        }
        Ok(self.ids.lock().unwrap().len())
    }

    fn is_duplicate(&self, fingerprint: &str) -> bool {
        self.contains(fingerprint)
    }

    fn add(&self, fingerprint: &str) {
        self.ids.lock().unwrap().insert(fingerprint.to_string());
    }
}

/// Records events as `kind:message_id[:detail]` strings.
#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Events without the progress ticks.
    pub(crate) fn item_events(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| !e.ends_with("_progress"))
            .collect()
    }

    pub(crate) fn position(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressSink for RecordingSink {
    fn on_start(&self, item: &MediaItem) {
        self.push(format!("start:{}", item.message_id));
    }

    fn on_download(&self, item: &MediaItem) {
        self.push(format!("download:{}", item.message_id));
    }

    fn on_upload(&self, item: &MediaItem, _remote_id: &str) {
        self.push(format!("upload:{}", item.message_id));
    }

    fn on_skip(&self, item: &MediaItem, reason: SkipReason) {
        self.push(format!("skip:{}:{}", item.message_id, reason));
    }

    fn on_error(&self, item: &MediaItem, _message: &str) {
        self.push(format!("error:{}", item.message_id));
    }

    fn on_download_progress(&self, _done: u64, _total: u64) {
        self.push("download_progress".to_string());
    }

    fn on_upload_progress(&self, _done: u64, _total: u64) {
        self.push("upload_progress".to_string());
    }
}
