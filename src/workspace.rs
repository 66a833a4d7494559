//! Per-run scratch space.
//!
//! A [`Workspace`] is a temporary directory owned by exactly one pipeline
//! run. Intermediate audio, overlay text files and unpromoted results live
//! inside it. Paths outside the directory that a run creates (for example a
//! partially copied output file) are registered with [`Workspace::track`]
//! and removed together with it.
//!
//! Cleanup happens once: either through [`Workspace::release`] or, when the
//! run unwinds or its future is dropped, through `Drop`.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::WorkspaceConfig;
use crate::error::Result;

#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
    path: PathBuf,
    tracked: Vec<PathBuf>,
}

impl Workspace {
    /// Create a fresh workspace for the run `run_id`.
    pub fn create(config: &WorkspaceConfig, run_id: Uuid) -> Result<Self> {
        let prefix = format!("voxdub-{}-", run_id.simple());
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let dir = match &config.root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        let path = dir.path().to_path_buf();

        debug!("Created workspace {}", path.display());

        Ok(Self {
            dir: Some(dir),
            path,
            tracked: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file directly inside the workspace.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Create (if needed) and return a subdirectory of the workspace.
    pub fn subdir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.path.join(name);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Remove `path` together with the workspace, even though it lives elsewhere.
    pub fn track<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        debug!("Tracking scratch path {}", path.display());
        self.tracked.push(path);
    }

    pub fn tracked(&self) -> &[PathBuf] {
        &self.tracked
    }

    /// Delete the workspace and every tracked path.
    pub fn release(mut self) -> Result<()> {
        self.cleanup()
    }

    fn cleanup(&mut self) -> Result<()> {
        let mut first_error = None;

        for path in self.tracked.drain(..) {
            if let Err(e) = remove_path(&path) {
                warn!("Failed to remove scratch path {}: {}", path.display(), e);
                first_error.get_or_insert(e);
            }
        }

        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => debug!("Removed workspace {}", self.path.display()),
                Err(e) => {
                    warn!("Failed to remove workspace {}: {}", self.path.display(), e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.dir.is_some() || !self.tracked.is_empty() {
            let _ = self.cleanup();
        }
    }
}

fn remove_path(path: &Path) -> io::Result<()> {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
