use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for one pipeline run.
///
/// `failed` is the sum of `download_failed` and `upload_failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: u64,
    pub downloaded: u64,
    pub uploaded: u64,
    pub skipped: u64,
    pub failed: u64,
    pub download_failed: u64,
    pub upload_failed: u64,
}

impl Stats {
    /// Every seen item accounted for exactly once. Holds once a run has
    /// completed; mid-run, queued items are not yet counted.
    pub fn is_balanced(&self) -> bool {
        self.total == self.skipped + self.download_failed + self.uploaded + self.upload_failed
            && self.failed == self.download_failed + self.upload_failed
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} uploaded, {} skipped, {} failed",
            self.uploaded, self.skipped, self.failed
        )
    }
}

/// Live counters shared by the producer and consumer stages.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    total: AtomicU64,
    downloaded: AtomicU64,
    uploaded: AtomicU64,
    skipped: AtomicU64,
    download_failed: AtomicU64,
    upload_failed: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn seen(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn downloaded(&self) {
        self.downloaded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn download_failed(&self) {
        self.download_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn uploaded(&self) {
        self.uploaded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn upload_failed(&self) {
        self.upload_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> Stats {
        let download_failed = self.download_failed.load(Ordering::Relaxed);
        let upload_failed = self.upload_failed.load(Ordering::Relaxed);
        Stats {
            total: self.total.load(Ordering::Relaxed),
            downloaded: self.downloaded.load(Ordering::Relaxed),
            uploaded: self.uploaded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: download_failed + upload_failed,
            download_failed,
            upload_failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_folds_failures() {
        let counters = StatsCounters::default();
        for _ in 0..5 {
            counters.seen();
        }
        counters.skipped();
        counters.downloaded();
        counters.downloaded();
        counters.downloaded();
        counters.download_failed();
        counters.uploaded();
        counters.uploaded();
        counters.upload_failed();

        let stats = counters.snapshot();
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.downloaded, 3);
        assert!(stats.is_balanced());
    }

    #[test]
    fn unbalanced_while_items_are_queued() {
        let counters = StatsCounters::default();
        counters.seen();
        counters.downloaded();
        assert!(!counters.snapshot().is_balanced());
    }

    #[test]
    fn display_summary() {
        let stats = Stats { uploaded: 3, skipped: 2, failed: 1, ..Default::default() };
        assert_eq!(stats.to_string(), "3 uploaded, 2 skipped, 1 failed");
    }

    #[test]
    fn serializes_flat_counters() {
        let stats = Stats { total: 4, uploaded: 4, downloaded: 4, ..Default::default() };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["total"], 4);
        assert_eq!(json["upload_failed"], 0);
    }
}
