//! One fetch → store → upload → cleanup cycle.

use crate::config::BikefeedConfig;
use crate::feed::{snapshot_paths, FeedDocument, SnapshotPaths};
use crate::retry::{invoke_with_retry, InvokePolicy};
use crate::staging::{self, StagedFile};
use crate::transport::Transport;
use crate::upload::{Destination, Uploader};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// What a completed cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub timestamp: String,
    pub uploaded: Vec<PathBuf>,
    /// Files removed from the working directory after upload.
    pub removed: usize,
}

/// Both snapshot files of a run, removed on drop.
struct Snapshot {
    timestamp: String,
    stations: StagedFile,
    status: StagedFile,
}

fn fetch_document(transport: &Transport, url: &str) -> Result<FeedDocument> {
    let resp = transport.get(url)?;
    let doc = FeedDocument::from_response(resp)?;
    Ok(doc)
}

/// Fetch both feeds and write them to the working directory.
fn stage_snapshot(cfg: &BikefeedConfig, transport: &Transport) -> Result<Snapshot> {
    staging::ensure_dir(&cfg.data_dir)?;

    let stations = fetch_document(transport, &cfg.feeds.stations_url)
        .context("fetch station information")?;
    let status =
        fetch_document(transport, &cfg.feeds.status_url).context("fetch station status")?;

    let timestamp = status.last_updated()?;
    let paths = snapshot_paths(&cfg.data_dir, &timestamp);

    let stations = StagedFile::write_json(paths.stations, stations.value())?;
    let status = StagedFile::write_json(paths.status, status.value())?;
    tracing::info!(timestamp = %timestamp, "snapshot written");

    Ok(Snapshot {
        timestamp,
        stations,
        status,
    })
}

fn upload_with_retry(
    uploader: &dyn Uploader,
    dest: &Destination,
    policy: &InvokePolicy,
    path: &Path,
) -> Result<()> {
    invoke_with_retry(policy, uploader.name(), || uploader.upload(dest, path))?;
    tracing::info!("wrote {} to {}", path.display(), dest.folder);
    Ok(())
}

/// Run one full cycle.
///
/// Upload failures are retried per `cfg.upload`; an exhausted upload ends the
/// run with an error, and this run's snapshot files are still removed.
pub fn run_cycle(
    cfg: &BikefeedConfig,
    transport: &Transport,
    uploader: &dyn Uploader,
) -> Result<CycleReport> {
    let snapshot = stage_snapshot(cfg, transport)?;
    let policy = cfg.upload.to_policy();

    tracing::info!(uploader = uploader.name(), "uploading snapshot");
    let mut uploaded = Vec::with_capacity(2);
    for staged in [&snapshot.stations, &snapshot.status] {
        upload_with_retry(uploader, &cfg.destination, &policy, staged.path())?;
        uploaded.push(staged.path().to_path_buf());
    }

    let removed = staging::clear_directory(&cfg.data_dir)?;
    tracing::info!(removed, "cleaned up temporary files");

    Ok(CycleReport {
        timestamp: snapshot.timestamp,
        uploaded,
        removed,
    })
}

/// Fetch and store both feeds without uploading; the files are kept.
pub fn fetch_snapshot(cfg: &BikefeedConfig, transport: &Transport) -> Result<SnapshotPaths> {
    let snapshot = stage_snapshot(cfg, transport)?;
    Ok(SnapshotPaths {
        stations: snapshot.stations.keep(),
        status: snapshot.status.keep(),
    })
}
