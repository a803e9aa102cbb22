//! Temporary local working directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory for locally generated files. It is removed when
/// the value is dropped, on success and on every error path alike; a
/// failed removal is logged and otherwise ignored.
#[derive(Debug)]
pub struct WorkArea {
    dir: Option<TempDir>,
}

impl WorkArea {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("panel-fm-")
            .tempdir()
            .context("Failed to create temporary work area")?;
        tracing::debug!("Work area at {}", dir.path().display());
        Ok(Self { dir: Some(dir) })
    }

    pub fn path(&self) -> &Path {
        self.dir.as_ref().map_or(Path::new(""), TempDir::path)
    }

    /// Write `contents` to a file called `name` inside the work area.
    pub fn write_file(&self, name: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.path().join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Remove the directory now, reporting the outcome.
    pub fn close(mut self) -> std::io::Result<()> {
        match self.dir.take() {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }
}

impl Drop for WorkArea {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                tracing::warn!("Failed to clean up work area {}: {}", path.display(), e);
            }
        }
    }
}
