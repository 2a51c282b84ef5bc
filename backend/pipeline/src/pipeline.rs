//! Two-stage transfer pipeline.
//!
//! One producer fetches, filters and downloads items sequentially and pushes
//! them onto a bounded queue; one consumer uploads them in FIFO order. Both
//! stages are futures joined on the caller's task, so they interleave only at
//! await points and a slow upload never holds up the next download until the
//! queue is full.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use tgup_core::{
    DestinationStore, DuplicateIndex, Downloader, ItemStream, MediaItem, MediaSource, NoopSink,
    ProgressSink, Result, SkipReason, TransferOptions, UploadOutcome, Uploader,
};

use crate::duplicates::NoDuplicateIndex;
use crate::existing::ExistingItems;
use crate::sink::deliver;
use crate::skip::SkipPolicy;
use crate::staging::PendingTransfer;
use crate::stats::{Stats, StatsCounters};

/// Moves items from a media source to a destination store.
///
/// Counters accumulate across calls to [`Pipeline::run`]; build one pipeline
/// per run.
pub struct Pipeline {
    source: Arc<dyn MediaSource>,
    downloader: Arc<dyn Downloader>,
    uploader: Arc<dyn Uploader>,
    store: Arc<dyn DestinationStore>,
    duplicates: Arc<dyn DuplicateIndex>,
    sink: Arc<dyn ProgressSink>,
    options: TransferOptions,
    policy: SkipPolicy,
    existing: ExistingItems,
    stats: StatsCounters,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn MediaSource>,
        downloader: Arc<dyn Downloader>,
        uploader: Arc<dyn Uploader>,
        store: Arc<dyn DestinationStore>,
        options: TransferOptions,
    ) -> Self {
        Self {
            source,
            downloader,
            uploader,
            store,
            duplicates: Arc::new(NoDuplicateIndex),
            sink: Arc::new(NoopSink),
            policy: SkipPolicy::from_options(&options),
            options,
            existing: ExistingItems::new(),
            stats: StatsCounters::default(),
        }
    }

    pub fn with_duplicates(mut self, duplicates: Arc<dyn DuplicateIndex>) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn options(&self) -> &TransferOptions {
        &self.options
    }

    /// Current counters; safe to read while a run is in progress.
    pub fn stats(&self) -> Stats {
        self.stats.snapshot()
    }

    pub fn existing(&self) -> &ExistingItems {
        &self.existing
    }

    /// Run the pipeline to completion.
    ///
    /// Only setup failures of the source are returned as errors; per-item
    /// failures are counted in the returned stats.
    pub async fn run(&self) -> Result<Stats> {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "transfer_run",
            %run_id,
            source = %self.options.source,
            dest = %self.options.dest_folder,
        );
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> Result<Stats> {
        self.existing.load(self.store.as_ref(), &self.options.dest_folder).await;

        match self.duplicates.load().await {
            Ok(count) => info!(count, "Duplicate index loaded"),
            Err(e) => warn!(error = %e, "Could not load duplicate index; continuing without it"),
        }

        let items = self.source.fetch(&self.options.fetch_query()).await?;

        let capacity = self.options.queue_capacity.max(1);
        let (queue_tx, queue_rx) = mpsc::channel(capacity);
        debug!(capacity, "Upload queue created");

        tokio::join!(self.produce(items, queue_tx), self.consume(queue_rx));

        let stats = self.stats.snapshot();
        info!(
            total = stats.total,
            downloaded = stats.downloaded,
            uploaded = stats.uploaded,
            skipped = stats.skipped,
            failed = stats.failed,
            "Transfer run finished"
        );
        Ok(stats)
    }

    /// First matching skip rule: policy, known duplicate, already stored.
    pub async fn skip_reason(&self, item: &MediaItem) -> Option<SkipReason> {
        if self.policy.rejects(item) {
            return Some(SkipReason::Filter);
        }

        if let Some(fingerprint) = item.fingerprint.as_deref() {
            if self.duplicates.is_duplicate(fingerprint) {
                return Some(SkipReason::Duplicate);
            }
        }

        let name = item.destination_name();
        if self
            .existing
            .file_exists(self.store.as_ref(), &self.options.dest_folder, &name)
            .await
        {
            return Some(SkipReason::Exists);
        }

        None
    }

    /// Producer stage. Dropping `queue` on return is the end-of-stream
    /// signal for the consumer.
    async fn produce(&self, mut items: ItemStream<'_>, queue: mpsc::Sender<PendingTransfer>) {
        while let Some(next) = items.next().await {
            let item = match next {
                Ok(item) => item,
                Err(e) => {
                    warn!(error = %e, "Source interrupted; no further items will be fetched");
                    break;
                }
            };
            self.stats.seen();

            if let Some(reason) = self.skip_reason(&item).await {
                self.stats.skipped();
                debug!(message_id = item.message_id, %reason, "Skipping item");
                self.notify("skip", |s| s.on_skip(&item, reason));
                continue;
            }

            let Some(pending) = self.download(item).await else {
                continue;
            };

            if let Err(mpsc::error::SendError(pending)) = queue.send(pending).await {
                self.fail_upload(&pending.item, "upload queue closed");
                pending.file.discard().await;
            }
        }
        debug!("Source exhausted; closing upload queue");
    }

    async fn download(&self, item: MediaItem) -> Option<PendingTransfer> {
        self.notify("start", |s| s.on_start(&item));

        let progress = |done: u64, total: u64| {
            self.notify("download_progress", |s| s.on_download_progress(done, total));
        };
        match self
            .downloader
            .download(&item, &self.options.download_dir, &progress)
            .await
        {
            Ok(path) => {
                self.stats.downloaded();
                debug!(message_id = item.message_id, path = %path.display(), "Downloaded");
                self.notify("download", |s| s.on_download(&item));
                Some(PendingTransfer::new(item, path))
            }
            Err(e) => {
                self.stats.download_failed();
                error!(message_id = item.message_id, error = %e, "Download failed");
                let message = e.to_string();
                self.notify("error", |s| s.on_error(&item, &message));
                None
            }
        }
    }

    /// Consumer stage: one upload at a time until the producer hangs up.
    async fn consume(&self, mut queue: mpsc::Receiver<PendingTransfer>) {
        while let Some(pending) = queue.recv().await {
            self.upload(pending).await;
        }
        debug!("Upload queue drained");
    }

    async fn upload(&self, pending: PendingTransfer) {
        let PendingTransfer { item, file } = pending;

        let progress = |done: u64, total: u64| {
            self.notify("upload_progress", |s| s.on_upload_progress(done, total));
        };
        let result = self
            .uploader
            .upload(file.path(), &item, &self.options.dest_folder, &progress)
            .await;

        match result {
            Ok(UploadOutcome::Uploaded { remote_id }) => {
                self.stats.uploaded();
                let name = item.destination_name();
                if let Some(fingerprint) = item.fingerprint.as_deref() {
                    self.duplicates.add(fingerprint);
                }
                info!(
                    message_id = item.message_id,
                    name = %name,
                    remote_id = %remote_id,
                    "Uploaded"
                );
                self.existing.insert(name).await;
                self.notify("upload", |s| s.on_upload(&item, &remote_id));
            }
            Ok(UploadOutcome::Rejected { reason }) => {
                self.fail_upload(&item, &format!("upload rejected: {reason}"));
            }
            Err(e) => self.fail_upload(&item, &e.to_string()),
        }

        file.discard().await;
    }

    fn fail_upload(&self, item: &MediaItem, message: &str) {
        self.stats.upload_failed();
        error!(message_id = item.message_id, error = %message, "Upload failed");
        self.notify("error", |s| s.on_error(item, message));
    }

    fn notify(&self, event: &'static str, hook: impl FnOnce(&dyn ProgressSink)) {
        deliver(self.sink.as_ref(), event, hook);
    }
}
