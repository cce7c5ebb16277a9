//! `bikefeed run` – one fetch, upload and cleanup cycle.

use anyhow::Result;
use bikefeed_core::config::BikefeedConfig;
use bikefeed_core::pipeline;
use bikefeed_core::upload::{DryRunUploader, SharePointUploader, Uploader};

use super::transport_from_config;

pub fn run_cycle(cfg: &BikefeedConfig, dry_run: bool) -> Result<()> {
    // Token must resolve before any network I/O.
    let uploader: Box<dyn Uploader> = if dry_run {
        Box::new(DryRunUploader)
    } else {
        Box::new(SharePointUploader::from_env(&cfg.token_env)?)
    };
    let transport = transport_from_config(cfg);

    println!("Uploading file to sharepoint.");
    let report = pipeline::run_cycle(cfg, &transport, uploader.as_ref())?;
    for path in &report.uploaded {
        println!("Wrote {} to {}", path.display(), cfg.destination.folder);
    }
    println!("Cleaned up temporary files.");
    tracing::info!(
        timestamp = %report.timestamp,
        removed = report.removed,
        "run completed"
    );
    Ok(())
}
