//! CLI command handlers, one per file.

mod config;
mod fetch;
mod run;

pub use config::run_config;
pub use fetch::run_fetch;
pub use run::run_cycle;

use bikefeed_core::config::BikefeedConfig;
use bikefeed_core::transport::Transport;
use std::time::Duration;

/// Feed transport built from the `[transport]` section.
pub(crate) fn transport_from_config(cfg: &BikefeedConfig) -> Transport {
    Transport::new(cfg.transport.to_policy()).with_timeouts(
        Duration::from_secs(cfg.transport.connect_timeout_secs),
        Duration::from_secs(cfg.transport.timeout_secs),
    )
}
