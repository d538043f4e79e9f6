// scratch.rs - Scoped scratch directories for intermediate tool files

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{ClusterError, ClusterResult};

/// A scratch directory that is removed when dropped, on success and error alike
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    // `None` when the directory is ours to remove
    temp: Option<TempDir>,
}

impl ScratchDir {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path for a file inside the scratch directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.temp.is_none() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

/// Hands out scratch directories, one per pipeline step
pub trait ScratchProvider: Send + Sync + Debug {
    fn acquire(&self, step: &str) -> ClusterResult<ScratchDir>;
}

/// Uniquely named temporary directories, optionally under a chosen base
#[derive(Debug, Clone, Default)]
pub struct TempScratch {
    base: Option<PathBuf>,
}

impl TempScratch {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }
}

impl ScratchProvider for TempScratch {
    fn acquire(&self, step: &str) -> ClusterResult<ScratchDir> {
        let prefix = format!("barclust-{}-", step);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);
        let dir = match &self.base {
            Some(base) => {
                fs::create_dir_all(base).map_err(|e| ClusterError::io(base, e))?;
                builder.tempdir_in(base).map_err(|e| ClusterError::io(base, e))?
            }
            None => builder
                .tempdir()
                .map_err(|e| ClusterError::io(std::env::temp_dir(), e))?,
        };
        Ok(ScratchDir {
            path: dir.path().to_path_buf(),
            temp: Some(dir),
        })
    }
}

/// Deterministic `<root>/<step>` directories, used by tests
#[derive(Debug, Clone)]
pub struct FixedScratch {
    root: PathBuf,
}

impl FixedScratch {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ScratchProvider for FixedScratch {
    fn acquire(&self, step: &str) -> ClusterResult<ScratchDir> {
        let path = self.root.join(step);
        fs::create_dir_all(&path).map_err(|e| ClusterError::io(&path, e))?;
        Ok(ScratchDir {
            path,
            temp: None,
        })
    }
}
