//! Config defaults: fills every unset field after loading.

use std::path::PathBuf;

use tgup_core::{DEFAULT_DEST_FOLDER, DEFAULT_QUEUE_CAPACITY};

use crate::io::config_dir;
use crate::schema::{DestinationConfig, LoggingConfig, TgupConfig, TransferConfig};

/// Default number of messages fetched per run.
pub const DEFAULT_LIMIT: usize = 100;

pub const DEFAULT_MEDIA_FILTER: &str = "all";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: TgupConfig) -> TgupConfig {
    let config = apply_transfer_defaults(config);
    let config = apply_destination_defaults(config);
    apply_logging_defaults(config)
}

fn apply_transfer_defaults(mut config: TgupConfig) -> TgupConfig {
    let transfer = config.transfer.get_or_insert_with(TransferConfig::default);
    transfer.dest_root.get_or_insert_with(|| DEFAULT_DEST_FOLDER.to_string());
    transfer
        .download_dir
        .get_or_insert_with(|| path_string(std::env::temp_dir().join("tgup")));
    transfer.limit.get_or_insert(DEFAULT_LIMIT);
    transfer.queue_capacity.get_or_insert(DEFAULT_QUEUE_CAPACITY);
    transfer.min_resolution.get_or_insert(0);
    transfer.min_duration.get_or_insert(0);
    transfer.media_filter.get_or_insert_with(|| DEFAULT_MEDIA_FILTER.to_string());
    transfer.flat.get_or_insert(false);
    config
}

/// A single local root under the user's data directory.
fn apply_destination_defaults(mut config: TgupConfig) -> TgupConfig {
    let destination = config.destination.get_or_insert_with(DestinationConfig::default);
    if destination.roots.is_empty() {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        destination.roots.push(path_string(base.join("tgup").join("store")));
    }
    config
}

fn apply_logging_defaults(mut config: TgupConfig) -> TgupConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.dir.get_or_insert_with(|| path_string(config_dir().join("logs")));
    logging.json_file.get_or_insert(false);
    config
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_transfer_field() {
        let cfg = apply_all_defaults(TgupConfig::default());
        let transfer = cfg.transfer();
        assert_eq!(transfer.dest_root.as_deref(), Some("/Telegram"));
        assert_eq!(transfer.limit, Some(DEFAULT_LIMIT));
        assert_eq!(transfer.queue_capacity, Some(DEFAULT_QUEUE_CAPACITY));
        assert_eq!(transfer.media_filter.as_deref(), Some("all"));
        assert_eq!(transfer.flat, Some(false));
        assert!(transfer.download_dir.is_some());
        assert_eq!(cfg.destination_roots().len(), 1);
        assert_eq!(cfg.logging().level.as_deref(), Some("info"));
    }

    #[test]
    fn does_not_override_user_values() {
        let mut cfg = TgupConfig::default();
        cfg.transfer = Some(TransferConfig {
            queue_capacity: Some(2),
            flat: Some(true),
            ..Default::default()
        });
        cfg.destination = Some(DestinationConfig { roots: vec!["/mnt/a".into()] });

        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.transfer().queue_capacity, Some(2));
        assert_eq!(cfg.transfer().flat, Some(true));
        assert_eq!(cfg.destination_roots(), ["/mnt/a"]);
    }
}
