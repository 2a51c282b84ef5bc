//! Callback bundle and fan-out for pipeline progress events.
//!
//! Hooks are fire-and-forget: a panic inside any hook is caught and logged,
//! never reaching pipeline state or control flow.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::debug;

use tgup_core::{MediaItem, ProgressSink, SkipReason};

type ItemHook = Box<dyn Fn(&MediaItem) + Send + Sync>;
type ItemTextHook = Box<dyn Fn(&MediaItem, &str) + Send + Sync>;
type SkipHook = Box<dyn Fn(&MediaItem, SkipReason) + Send + Sync>;
type ProgressHook = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Run one hook, swallowing any panic it raises.
pub(crate) fn deliver(
    sink: &dyn ProgressSink,
    event: &'static str,
    hook: impl FnOnce(&dyn ProgressSink),
) {
    if panic::catch_unwind(AssertUnwindSafe(|| hook(sink))).is_err() {
        debug!(event, "Progress hook panicked; ignoring");
    }
}

/// Independently optional closures, one per pipeline event.
///
/// Unset hooks are skipped.
#[derive(Default)]
pub struct Callbacks {
    on_start: Option<ItemHook>,
    on_download: Option<ItemHook>,
    on_upload: Option<ItemTextHook>,
    on_skip: Option<SkipHook>,
    on_error: Option<ItemTextHook>,
    on_download_progress: Option<ProgressHook>,
    on_upload_progress: Option<ProgressHook>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start(mut self, f: impl Fn(&MediaItem) + Send + Sync + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    pub fn with_download(mut self, f: impl Fn(&MediaItem) + Send + Sync + 'static) -> Self {
        self.on_download = Some(Box::new(f));
        self
    }

    pub fn with_upload(mut self, f: impl Fn(&MediaItem, &str) + Send + Sync + 'static) -> Self {
        self.on_upload = Some(Box::new(f));
        self
    }

    pub fn with_skip(mut self, f: impl Fn(&MediaItem, SkipReason) + Send + Sync + 'static) -> Self {
        self.on_skip = Some(Box::new(f));
        self
    }

    pub fn with_error(mut self, f: impl Fn(&MediaItem, &str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn with_download_progress(mut self, f: impl Fn(u64, u64) + Send + Sync + 'static) -> Self {
        self.on_download_progress = Some(Box::new(f));
        self
    }

    pub fn with_upload_progress(mut self, f: impl Fn(u64, u64) + Send + Sync + 'static) -> Self {
        self.on_upload_progress = Some(Box::new(f));
        self
    }
}

impl ProgressSink for Callbacks {
    fn on_start(&self, item: &MediaItem) {
        if let Some(f) = &self.on_start {
            f(item);
        }
    }

    fn on_download(&self, item: &MediaItem) {
        if let Some(f) = &self.on_download {
            f(item);
        }
    }

    fn on_upload(&self, item: &MediaItem, remote_id: &str) {
        if let Some(f) = &self.on_upload {
            f(item, remote_id);
        }
    }

    fn on_skip(&self, item: &MediaItem, reason: SkipReason) {
        if let Some(f) = &self.on_skip {
            f(item, reason);
        }
    }

    fn on_error(&self, item: &MediaItem, message: &str) {
        if let Some(f) = &self.on_error {
            f(item, message);
        }
    }

    fn on_download_progress(&self, done: u64, total: u64) {
        if let Some(f) = &self.on_download_progress {
            f(done, total);
        }
    }

    fn on_upload_progress(&self, done: u64, total: u64) {
        if let Some(f) = &self.on_upload_progress {
            f(done, total);
        }
    }
}

/// Forwards every event to each inner sink in order.
///
/// A panicking sink does not stop delivery to the ones after it.
#[derive(Default, Clone)]
pub struct SinkFanout {
    sinks: Vec<Arc<dyn ProgressSink>>,
}

impl SinkFanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn each(&self, event: &'static str, hook: impl Fn(&dyn ProgressSink)) {
        for sink in &self.sinks {
            deliver(sink.as_ref(), event, &hook);
        }
    }
}

impl ProgressSink for SinkFanout {
    fn on_start(&self, item: &MediaItem) {
        self.each("start", |s| s.on_start(item));
    }

    fn on_download(&self, item: &MediaItem) {
        self.each("download", |s| s.on_download(item));
    }

    fn on_upload(&self, item: &MediaItem, remote_id: &str) {
        self.each("upload", |s| s.on_upload(item, remote_id));
    }

    fn on_skip(&self, item: &MediaItem, reason: SkipReason) {
        self.each("skip", |s| s.on_skip(item, reason));
    }

    fn on_error(&self, item: &MediaItem, message: &str) {
        self.each("error", |s| s.on_error(item, message));
    }

    fn on_download_progress(&self, done: u64, total: u64) {
        self.each("download_progress", |s| s.on_download_progress(done, total));
    }

    fn on_upload_progress(&self, done: u64, total: u64) {
        self.each("upload_progress", |s| s.on_upload_progress(done, total));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{item, RecordingSink};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn unset_hooks_are_skipped() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let callbacks = Callbacks::new().with_skip(move |_, reason| {
            assert_eq!(reason, SkipReason::Duplicate);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let media = item(1);
        callbacks.on_start(&media);
        callbacks.on_upload(&media, "id");
        callbacks.on_skip(&media, SkipReason::Duplicate);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn deliver_swallows_panics() {
        let callbacks = Callbacks::new().with_error(|_, _| panic!("ui fault"));
        deliver(&callbacks, "error", |s| s.on_error(&item(1), "boom"));
    }

    #[test]
    fn fanout_survives_a_panicking_sink() {
        let recorder = Arc::new(RecordingSink::default());
        let fanout = SinkFanout::new()
            .with(Arc::new(Callbacks::new().with_start(|_| panic!("first sink broken"))))
            .with(recorder.clone());
        assert_eq!(fanout.len(), 2);

        fanout.on_start(&item(4));
        assert_eq!(recorder.events(), vec!["start:4".to_string()]);
    }
}
