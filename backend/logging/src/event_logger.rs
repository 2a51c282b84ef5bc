//! Transfer Event Logger
//!
//! Terminal per-item outcomes written as structured `tracing` events on the
//! `transfer_events` target, which the NDJSON file layer picks up.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use tgup_core::{MediaItem, ProgressSink, SkipReason};

use crate::redact::redact_sensitive_data;

pub const EVENT_TARGET: &str = "transfer_events";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferEvent {
    Started,
    Downloaded,
    Uploaded { remote_id: String },
    Skipped { reason: SkipReason },
    Failed { error_msg: String },
}

#[derive(Debug, Serialize)]
pub struct TransferLogEntry {
    pub source: String,
    pub chat_id: i64,
    pub message_id: i64,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub event: TransferEvent,
}

impl TransferLogEntry {
    /// Build an entry, scrubbing any free text in the event.
    pub fn new(source: &str, item: &MediaItem, mut event: TransferEvent) -> Self {
        if let TransferEvent::Failed { error_msg } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }
        Self {
            source: source.to_string(),
            chat_id: item.chat_id,
            message_id: item.message_id,
            name: item.destination_name(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Progress sink that logs every item outcome. Byte progress is ignored.
#[derive(Debug, Clone)]
pub struct TransferEventLogger {
    source: String,
}

impl TransferEventLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    pub fn log_event(&self, item: &MediaItem, event: TransferEvent) {
        let entry = TransferLogEntry::new(&self.source, item, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: EVENT_TARGET, event = %json, "Transfer event");
    }
}

impl ProgressSink for TransferEventLogger {
    fn on_start(&self, item: &MediaItem) {
        self.log_event(item, TransferEvent::Started);
    }

    fn on_download(&self, item: &MediaItem) {
        self.log_event(item, TransferEvent::Downloaded);
    }

    fn on_upload(&self, item: &MediaItem, remote_id: &str) {
        self.log_event(item, TransferEvent::Uploaded { remote_id: remote_id.to_string() });
    }

    fn on_skip(&self, item: &MediaItem, reason: SkipReason) {
        self.log_event(item, TransferEvent::Skipped { reason });
    }

    fn on_error(&self, item: &MediaItem, message: &str) {
        self.log_event(item, TransferEvent::Failed { error_msg: message.to_string() });
    }
}
