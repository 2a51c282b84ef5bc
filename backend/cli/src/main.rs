mod config_cmd;
mod terminal_output;
mod up_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;

use tgup_config::{config_dir, config_file_path, load_and_prepare};
use tgup_logging::init_logger;

use terminal_output::note_error;
use up_cmd::UpArgs;

#[derive(Parser)]
#[command(name = "tgup")]
#[command(about = "tgup: move media from a channel into cloud storage")]
#[command(version)]
struct Cli {
    /// Config directory (default: $TGUP_CONFIG_DIR or ~/.config/tgup)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transfer media from a source folder
    Up(UpArgs),
    /// Show the effective configuration
    Config {
        /// Write a config file with the default values
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dir = cli.config_dir.clone().unwrap_or_else(config_dir);

    if let Commands::Config { init: true } = cli.command {
        return config_cmd::run(&dir, &Default::default(), true).await;
    }

    let config = load_and_prepare(&config_file_path(&dir)).await?;
    let logging = config.logging();
    init_logger(
        &PathBuf::from(logging.dir.unwrap_or_default()),
        logging.level.as_deref().unwrap_or("info"),
        logging.json_file.unwrap_or(false),
    )?;

    match cli.command {
        Commands::Up(args) => {
            if let Err(e) = up_cmd::run(args, config).await {
                error!(error = %e, "Transfer aborted");
                note_error(&format!("{e:#}"));
                std::process::exit(1);
            }
        }
        Commands::Config { .. } => config_cmd::run(&dir, &config, false).await?,
    }

    Ok(())
}
