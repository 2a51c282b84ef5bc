//! Config validation: field-level checks with user-friendly messages.

use tgup_core::MediaFilter;
use thiserror::Error;

use crate::schema::TgupConfig;

/// Short side of an 8K UHD frame.
const MAX_SANE_RESOLUTION: u32 = 4320;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &TgupConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_transfer(config, &mut report);
    validate_destination(config, &mut report);
    report
}

fn validate_transfer(config: &TgupConfig, report: &mut ValidationReport) {
    let Some(transfer) = &config.transfer else { return };

    if transfer.queue_capacity == Some(0) {
        report.error("transfer.queue_capacity", "queue_capacity must be >= 1");
    }
    if transfer.limit == Some(0) {
        report.error("transfer.limit", "limit must be > 0");
    }
    if let Some(root) = &transfer.dest_root {
        if !root.starts_with('/') {
            report.error(
                "transfer.dest_root",
                format!("dest_root '{root}' must be an absolute remote path"),
            );
        }
    }
    if let Some(res) = transfer.min_resolution {
        if res > MAX_SANE_RESOLUTION {
            report.warn(
                "transfer.min_resolution",
                format!(
                    "min_resolution {res} exceeds {MAX_SANE_RESOLUTION}; \
                     every item with known dimensions will be skipped"
                ),
            );
        }
    }
    if let Some(filter) = &transfer.media_filter {
        if !MediaFilter::is_known(filter) {
            report.warn(
                "transfer.media_filter",
                format!("Unknown media_filter '{filter}'. Use 'all', 'video', or 'photo'"),
            );
        }
    }
}

fn validate_destination(config: &TgupConfig, report: &mut ValidationReport) {
    for (i, root) in config.destination_roots().iter().enumerate() {
        if root.trim().is_empty() {
            report.error(format!("destination.roots[{i}]"), "Root path cannot be empty");
        }
    }
}
