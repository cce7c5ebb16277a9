//! CLI for bikefeed.

mod commands;

use anyhow::Result;
use bikefeed_core::config::{self, BikefeedConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_config, run_cycle, run_fetch};

/// Top-level CLI for bikefeed.
#[derive(Debug, Parser)]
#[command(name = "bikefeed")]
#[command(about = "Fetch bike-share GBFS feeds and upload snapshots to SharePoint", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/bikefeed/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch both feeds, upload the snapshot files, then remove them.
    Run {
        /// Working directory for snapshot files (default from config: ./data).
        /// Every regular file in DIR is deleted after both uploads succeed,
        /// so point this at a directory used only by bikefeed.
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
        /// Log the uploads instead of sending them.
        #[arg(long)]
        dry_run: bool,
    },

    /// Fetch both feeds and keep the snapshot files; no upload.
    Fetch {
        /// Directory to write snapshot files into (default from config: ./data).
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run { data_dir, dry_run } => {
                run_cycle(&with_data_dir(cfg, data_dir), dry_run)?
            }
            CliCommand::Fetch { data_dir } => run_fetch(&with_data_dir(cfg, data_dir))?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

fn with_data_dir(mut cfg: BikefeedConfig, data_dir: Option<PathBuf>) -> BikefeedConfig {
    if let Some(dir) = data_dir {
        cfg.data_dir = dir;
    }
    cfg
}

#[cfg(test)]
mod tests;
