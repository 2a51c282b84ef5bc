//! `tgup up`: transfer one source folder to the destination store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use tgup_config::{
    to_transfer_options, validate, DestinationConfig, DuplicatesConfig, TgupConfig, TransferConfig,
};
use tgup_logging::TransferEventLogger;
use tgup_pipeline::{Pipeline, SinkFanout, Stats};
use tgup_storage::{FileDownloader, FolderSource, KnownIdIndex, LocalStore};

use crate::terminal_output::{note_info, note_success, note_warn, TerminalDisplay};

#[derive(Debug, Clone, Args)]
pub struct UpArgs {
    /// Folder whose files are transferred
    pub source: PathBuf,

    /// Maximum number of messages to fetch
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Oldest first
    #[arg(short, long)]
    pub reverse: bool,

    /// Media kinds to transfer: all, video(s) or photo(s)
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Skip items whose shorter side is below this many pixels
    #[arg(long = "min-res")]
    pub min_resolution: Option<u32>,

    /// Skip items shorter than this many seconds
    #[arg(long = "min-dur")]
    pub min_duration: Option<u32>,

    /// Upload straight into the destination root, without a per-channel folder
    #[arg(long)]
    pub flat: bool,

    /// Destination root directory (repeat for several)
    #[arg(long = "dest", value_name = "ROOT_DIR")]
    pub dest: Vec<PathBuf>,

    /// JSON snapshot of known fingerprints
    #[arg(long = "known-ids", value_name = "PATH")]
    pub known_ids: Option<PathBuf>,

    /// Chat id stamped on fetched items
    #[arg(long = "chat-id", default_value_t = 0)]
    pub chat_id: i64,
}

impl UpArgs {
    /// Overlay command-line flags on the loaded config.
    pub fn apply_to(&self, config: &mut TgupConfig) {
        let transfer = config.transfer.get_or_insert_with(TransferConfig::default);
        if self.limit.is_some() {
            transfer.limit = self.limit;
        }
        if let Some(filter) = &self.filter {
            transfer.media_filter = Some(filter.clone());
        }
        if self.min_resolution.is_some() {
            transfer.min_resolution = self.min_resolution;
        }
        if self.min_duration.is_some() {
            transfer.min_duration = self.min_duration;
        }
        if self.flat {
            transfer.flat = Some(true);
        }
        if !self.dest.is_empty() {
            config.destination = Some(DestinationConfig {
                roots: self.dest.iter().map(|p| p.display().to_string()).collect(),
            });
        }
        if let Some(path) = &self.known_ids {
            config.duplicates.get_or_insert_with(DuplicatesConfig::default).known_ids_path =
                Some(path.display().to_string());
        }
    }
}

/// Destination folder name for a source folder.
pub fn channel_name(source: &Path) -> String {
    source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "default".to_string())
}

/// Run one transfer. Ctrl-C cancels the run; staged files are removed.
pub async fn run(args: UpArgs, mut config: TgupConfig) -> Result<Stats> {
    args.apply_to(&mut config);
    let report = validate(&config);
    if !report.is_valid() {
        let messages: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("invalid options: {}", messages.join("; "));
    }
    for warning in &report.warnings {
        note_warn(&warning.message);
    }

    let channel = channel_name(&args.source);
    let mut options = to_transfer_options(&config, &args.source.display().to_string(), &channel);
    options.reverse = args.reverse;

    let roots: Vec<PathBuf> = config.destination_roots().iter().map(PathBuf::from).collect();
    let store = Arc::new(LocalStore::new(roots).context("Failed to open destination store")?);
    let index = Arc::new(KnownIdIndex::new(config.known_ids_path().map(PathBuf::from)));
    let sink = SinkFanout::new()
        .with(Arc::new(TerminalDisplay::stdout()))
        .with(Arc::new(TransferEventLogger::new(&channel)));

    let pipeline = Pipeline::new(
        Arc::new(FolderSource::new(args.chat_id)),
        Arc::new(FileDownloader::new(&args.source)),
        store.clone(),
        store,
        options,
    )
    .with_duplicates(index)
    .with_sink(Arc::new(sink));

    note_info(&format!(
        "Transferring {} -> {}",
        args.source.display(),
        pipeline.options().dest_folder
    ));
    info!(source = %args.source.display(), channel = %channel, "Starting transfer");

    let stats = tokio::select! {
        result = pipeline.run() => result.context("Transfer failed")?,
        _ = tokio::signal::ctrl_c() => {
            let partial = pipeline.stats();
            note_warn(&format!("Interrupted after {partial}"));
            bail!("interrupted");
        }
    };

    note_success(&format!("Done: {stats}"));
    Ok(stats)
}
