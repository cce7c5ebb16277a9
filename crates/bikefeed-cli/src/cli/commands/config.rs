//! `bikefeed config` – print the effective configuration.

use anyhow::Result;
use bikefeed_core::config::BikefeedConfig;

pub fn run_config(cfg: &BikefeedConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
