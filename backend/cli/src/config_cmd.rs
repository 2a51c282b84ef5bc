//! `tgup config`: show or initialise the config file.

use std::path::Path;

use anyhow::{Context, Result};

use tgup_config::{apply_all_defaults, config_file_path, write_config, TgupConfig};

use crate::terminal_output::note_success;

/// Print the effective config, or write the defaults when `init` is set.
pub async fn run(config_dir: &Path, config: &TgupConfig, init: bool) -> Result<()> {
    if init {
        let path = config_file_path(config_dir);
        write_config(&apply_all_defaults(TgupConfig::default()), &path).await?;
        note_success(&format!("Wrote {}", path.display()));
        return Ok(());
    }

    let yaml = serde_yaml::to_string(config).context("Failed to render config")?;
    print!("{yaml}");
    Ok(())
}
