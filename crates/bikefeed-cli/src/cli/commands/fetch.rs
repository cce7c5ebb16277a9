//! `bikefeed fetch` – fetch and store a snapshot without uploading.

use anyhow::Result;
use bikefeed_core::config::BikefeedConfig;
use bikefeed_core::pipeline;

use super::transport_from_config;

pub fn run_fetch(cfg: &BikefeedConfig) -> Result<()> {
    let paths = pipeline::fetch_snapshot(cfg, &transport_from_config(cfg))?;
    println!("{}", paths.stations.display());
    println!("{}", paths.status.display());
    Ok(())
}
