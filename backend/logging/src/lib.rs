//! Structured logging for tgup.
//!
//! Handles subscriber setup, log redaction, and per-item transfer event
//! logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{TransferEvent, TransferEventLogger, TransferLogEntry, EVENT_TARGET};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
