use crate::retry::{InvokePolicy, TransportRetryPolicy};
use crate::upload::Destination;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The two GBFS feeds fetched each run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedsConfig {
    pub stations_url: String,
    /// Must carry `last_updated`; it names both snapshot files.
    pub status_url: String,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            stations_url: "https://gbfs.citibikenyc.com/gbfs/en/station_information.json"
                .to_string(),
            status_url: "https://gbfs.citibikenyc.com/gbfs/en/station_status.json".to_string(),
        }
    }
}

/// Feed GET retry parameters (`[transport]` in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub total: u32,
    pub connect: u32,
    pub read: u32,
    /// Seconds; delay before retry n is `backoff_factor * 2^(n-1)`.
    pub backoff_factor: f64,
    pub backoff_max_secs: u64,
    pub status_forcelist: Vec<u16>,
    pub respect_retry_after: bool,
    pub raise_on_status: bool,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        let p = TransportRetryPolicy::default();
        Self {
            total: p.total,
            connect: p.connect,
            read: p.read,
            backoff_factor: p.backoff_factor,
            backoff_max_secs: p.backoff_max.as_secs(),
            status_forcelist: p.status_forcelist,
            respect_retry_after: p.respect_retry_after,
            raise_on_status: p.raise_on_status,
            connect_timeout_secs: 15,
            timeout_secs: 60,
        }
    }
}

impl TransportConfig {
    pub fn to_policy(&self) -> TransportRetryPolicy {
        TransportRetryPolicy {
            total: self.total,
            connect: self.connect,
            read: self.read,
            backoff_factor: self.backoff_factor,
            backoff_max: Duration::from_secs(self.backoff_max_secs),
            status_forcelist: self.status_forcelist.clone(),
            respect_retry_after: self.respect_retry_after,
            raise_on_status: self.raise_on_status,
        }
    }
}

/// Upload retry parameters (`[upload]` in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub retries: u32,
    pub delay_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            delay_secs: 10,
        }
    }
}

impl UploadConfig {
    pub fn to_policy(&self) -> InvokePolicy {
        InvokePolicy::new(self.retries, Duration::from_secs(self.delay_secs))
    }
}

/// Global configuration loaded from `~/.config/bikefeed/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BikefeedConfig {
    /// Working directory for snapshot files (relative paths resolve against the cwd).
    /// `run` deletes every regular file in it after a successful upload.
    pub data_dir: PathBuf,
    /// Environment variable holding the SharePoint bearer token.
    pub token_env: String,
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub destination: Destination,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

impl Default for BikefeedConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            token_env: "SHAREPOINT_ACCESS_TOKEN".to_string(),
            feeds: FeedsConfig::default(),
            destination: Destination::default(),
            transport: TransportConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bikefeed")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BikefeedConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BikefeedConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit path; the file must exist.
pub fn load_from_path(path: &Path) -> Result<BikefeedConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: BikefeedConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
