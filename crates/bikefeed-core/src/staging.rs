//! Local working directory and staged snapshot files.
//!
//! A [`StagedFile`] removes its file when dropped, so a run that fails
//! half-way (for example on an exhausted upload) still leaves nothing behind.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Create the working directory (and parents) if absent.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create dir: {}", dir.display()))
}

/// A file owned by this run. Deleted on drop unless [`StagedFile::keep`] is called.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    armed: bool,
}

impl StagedFile {
    /// Write `value` as UTF-8 JSON to `path`. The guard exists before the first
    /// byte is written, so a failed write is cleaned up too.
    pub fn write_json(path: impl Into<PathBuf>, value: &Value) -> Result<Self> {
        let staged = Self {
            path: path.into(),
            armed: true,
        };
        let file = fs::File::create(&staged.path)
            .with_context(|| format!("create {}", staged.path.display()))?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer(&mut w, value)
            .with_context(|| format!("encode {}", staged.path.display()))?;
        w.flush()
            .with_context(|| format!("write {}", staged.path.display()))?;
        tracing::debug!(path = %staged.path.display(), "staged snapshot file");
        Ok(staged)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Disarm the guard and hand back the path; the file stays on disk.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed staged file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), "could not remove staged file: {}", e),
        }
    }
}

/// Remove every regular file directly inside `dir`. Subdirectories are left alone.
/// Returns the number of files removed.
pub fn clear_directory(dir: &Path) -> Result<usize> {
    let mut removed = 0usize;
    let entries = fs::read_dir(dir).with_context(|| format!("read dir: {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read dir: {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
        removed += 1;
    }
    Ok(removed)
}
