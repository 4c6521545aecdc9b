//! State directory layout and locking
//!
//! Everything relbin owns lives under one root (default `~/.relbin`):
//!
//! ```text
//! ~/.relbin/
//!   bin/          installed binaries (add to PATH)
//!   pkg/          release assets of installed packages
//!   incoming/     downloads not yet accepted into pkg/
//!   tmp/          staging area for extraction
//!   relbin.lock   installed packages
//!   config.yaml   optional settings
//!   .lock         advisory lock held while the lock file is modified
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use fslock::LockFile;
use tracing::debug;

use crate::error::{RelbinError, Result};

/// Default state directory name under the user's home directory
pub const STATE_DIR: &str = ".relbin";

/// Installed binaries
pub const BIN_DIR: &str = "bin";

/// Downloaded assets
pub const PKG_DIR: &str = "pkg";

/// Downloads waiting for the install to succeed
pub const INCOMING_DIR: &str = "incoming";

/// Extraction staging area
pub const TMP_DIR: &str = "tmp";

/// Lock file recording installed packages
pub const LOCKFILE: &str = "relbin.lock";

/// Settings file
pub const CONFIG_FILE: &str = "config.yaml";

/// Advisory lock file guarding lock file updates
pub const GUARD_FILE: &str = ".lock";

/// Resolved paths of a state directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    pub root: PathBuf,
    pub bin: PathBuf,
    pub pkg: PathBuf,
    pub incoming: PathBuf,
    pub tmp: PathBuf,
    pub lockfile: PathBuf,
    pub config: PathBuf,
}

impl StatePaths {
    /// Layout under `root` (nothing is checked or created)
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            bin: root.join(BIN_DIR),
            pkg: root.join(PKG_DIR),
            incoming: root.join(INCOMING_DIR),
            tmp: root.join(TMP_DIR),
            lockfile: root.join(LOCKFILE),
            config: root.join(CONFIG_FILE),
            root,
        }
    }

    /// Default root: `~/.relbin`
    pub fn default_root() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| RelbinError::IoError {
            message: "Could not determine home directory".to_string(),
        })?;
        Ok(home.join(STATE_DIR))
    }

    /// Open an existing state directory
    ///
    /// `home` overrides the default root (`--home` / `RELBIN_HOME`). A missing
    /// root is an error; missing subdirectories are created.
    pub fn discover(home: Option<PathBuf>) -> Result<Self> {
        let root = match home {
            Some(path) => path,
            None => Self::default_root()?,
        };

        if !root.is_dir() {
            return Err(RelbinError::StatePathNotFound {
                path: root.display().to_string(),
            });
        }

        let paths = Self::from_root(root);
        paths.create_subdirs()?;
        debug!("Using state directory {}", paths.root.display());
        Ok(paths)
    }

    /// Create the state directory and its subdirectories
    pub fn init(home: Option<PathBuf>) -> Result<Self> {
        let root = match home {
            Some(path) => path,
            None => Self::default_root()?,
        };

        let paths = Self::from_root(root);
        create_dir(&paths.root)?;
        paths.create_subdirs()?;
        Ok(paths)
    }

    fn create_subdirs(&self) -> Result<()> {
        for dir in [&self.bin, &self.pkg, &self.incoming, &self.tmp] {
            create_dir(dir)?;
        }
        Ok(())
    }

    /// Path of a downloaded asset
    pub fn asset_path(&self, asset: &str) -> PathBuf {
        self.pkg.join(asset)
    }

    /// Where a download of `asset` waits before it is moved into `pkg/`
    pub fn incoming_path(&self, asset: &str) -> PathBuf {
        self.incoming.join(asset)
    }

    /// Path of an installed binary
    pub fn binary_path(&self, binary: &str) -> PathBuf {
        self.bin.join(binary)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| RelbinError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Holds the advisory lock on a state directory until dropped
pub struct StateGuard {
    lock: LockFile,
}

impl StateGuard {
    /// Acquire the lock without blocking
    pub fn acquire(paths: &StatePaths) -> Result<Self> {
        let lock_path = paths.root.join(GUARD_FILE);

        let mut lock = LockFile::open(&lock_path).map_err(|e| RelbinError::StateLocked {
            reason: format!("Failed to open lock file: {e}"),
        })?;

        let acquired = lock.try_lock().map_err(|e| RelbinError::StateLocked {
            reason: format!("Failed to try lock: {e}"),
        })?;

        if !acquired {
            return Err(RelbinError::StateLocked {
                reason: "held by another process".to_string(),
            });
        }

        debug!("Acquired state lock {}", lock_path.display());
        Ok(Self { lock })
    }
}

impl Drop for StateGuard {
    fn drop(&mut self) {
        let _ = self.lock.unlock();
    }
}
