//! `tgup-config` — tgup runtime configuration.
//!
//! Provides:
//! - Typed config schema (transfer, duplicates, destination, logging)
//! - YAML read/write with atomic backup rotation
//! - `${ENV_VAR}` substitution and `TGUP_*` overrides
//! - Default value application
//! - Field validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, apply_env_overrides_with, resolve_env_vars, resolve_env_vars_with,
    MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::{DestinationConfig, DuplicatesConfig, LoggingConfig, TgupConfig, TransferConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tgup_core::{MediaFilter, TransferOptions};

/// Load, substitute env vars, apply overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime. Validation
/// errors are returned together; warnings are only logged.
pub async fn load_and_prepare(path: &Path) -> Result<TgupConfig> {
    let raw_config = load_config(path).await?;

    let value: Value =
        serde_json::to_value(&raw_config).context("Failed to serialize config for processing")?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    let config: TgupConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config)?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        let messages: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("invalid config: {}", messages.join("; "));
    }

    Ok(config)
}

/// Build pipeline options for one run over `source`.
///
/// Files land in `{dest_root}/{channel}`, or directly in `dest_root` when
/// `flat` is set. Unset fields take their defaults.
pub fn to_transfer_options(config: &TgupConfig, source: &str, channel: &str) -> TransferOptions {
    let transfer = apply_all_defaults(config.clone()).transfer();
    let dest_root = transfer.dest_root.unwrap_or_default();
    let download_dir = PathBuf::from(transfer.download_dir.unwrap_or_default());

    let mut options = TransferOptions::new(source, download_dir);
    options.limit = transfer.limit;
    options.media_filter = MediaFilter::parse(transfer.media_filter.as_deref().unwrap_or_default());
    options.min_resolution = transfer.min_resolution.unwrap_or(0);
    options.min_duration = transfer.min_duration.unwrap_or(0);
    if let Some(capacity) = transfer.queue_capacity {
        options.queue_capacity = capacity;
    }
    options.dest_folder = if transfer.flat.unwrap_or(false) {
        dest_root
    } else {
        tgup_core::remote_path(&dest_root, channel)
    };
    options
}
