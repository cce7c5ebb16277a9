//! Document destination for snapshot files.
//!
//! The pipeline only depends on the [`Uploader`] trait; SharePoint is the
//! production backend and [`DryRunUploader`] stands in when nothing should leave
//! the machine.

mod sharepoint;

pub use sharepoint::SharePointUploader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where snapshot files go: a site, a document library in it, and a folder in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub site_url: String,
    pub library: String,
    pub folder: String,
}

impl Default for Destination {
    fn default() -> Self {
        Self {
            site_url: "https://tylin1.sharepoint.com/teams/SSC23-05-0400/".to_string(),
            library: "Documents".to_string(),
            folder: "23-05-0400/04 - Analysis/01 - Data/_temp/azure_test".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("upload request failed: {0}")]
    Curl(#[from] curl::Error),
    #[error("upload rejected with HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("invalid destination: {0}")]
    InvalidDestination(String),
    #[error("access token not set (expected in ${0})")]
    MissingToken(String),
}

/// Sends one local file to a destination.
pub trait Uploader {
    /// Operation name used in retry logs and terminal errors.
    fn name(&self) -> &str;

    fn upload(&self, dest: &Destination, path: &Path) -> Result<(), UploadError>;
}

/// Logs what would be uploaded and succeeds without any network I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunUploader;

impl Uploader for DryRunUploader {
    fn name(&self) -> &str {
        "dry_run_upload"
    }

    fn upload(&self, dest: &Destination, path: &Path) -> Result<(), UploadError> {
        let meta = std::fs::metadata(path).map_err(|source| UploadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            bytes = meta.len(),
            site = %dest.site_url,
            library = %dest.library,
            folder = %dest.folder,
            "dry run: skipping upload"
        );
        Ok(())
    }
}
