//! Scoped staging directory
//!
//! Extraction happens in `<root>/tmp`. The guard wipes stale contents when it
//! is created and removes the directory again when dropped, so every exit
//! from an install leaves no staging behind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::common::fs as fs_utils;
use crate::error::{RelbinError, Result};

#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
    removed: bool,
}

impl StagingDir {
    /// Start from an empty directory at `path`
    pub fn create(path: &Path) -> Result<Self> {
        fs_utils::remove_path(path)?;
        fs::create_dir_all(path).map_err(|e| RelbinError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory now, reporting failures
    pub fn remove(mut self) -> Result<()> {
        self.removed = true;
        fs_utils::remove_path(&self.path)
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if !self.removed {
            if let Err(e) = fs_utils::remove_path(&self.path) {
                warn!("Failed to clean staging directory: {}", e);
            }
        }
    }
}
