//! Structured Logger
//!
//! Wraps `tracing` with console output, an optional daily-rolling NDJSON
//! file, and environment-based level control.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "tgup.log";

/// Initialize the global logger.
///
/// `RUST_LOG` wins over `level`. Console output goes to stderr so it does
/// not interleave with progress lines on stdout. When `json_file` is set,
/// events are also written as NDJSON to `log_dir/tgup.log.YYYY-MM-DD`.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logger(log_dir: &Path, level: &str, json_file: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::env::var_os("NO_COLOR").is_none());

    let file_layer = if json_file {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
        let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
        Some(fmt::layer().json().with_writer(appender).with_ansi(false).boxed())
    } else {
        None
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}
