//! Installation engine
//!
//! Turns a downloaded asset into an installed binary:
//!
//! - Extracting the asset into the staging directory
//! - Locating the binary among the extracted files
//! - Resolving a name conflict with an already installed binary
//! - Copying the binary into `bin/` and moving the asset into `pkg/`
//!
//! Downloads wait in `incoming/` until the conflict is resolved, so a
//! declined install never touches a file another package owns.
//!
//! The lock file is passed in by value and handed back on success. The
//! engine only ever removes a conflicting entry; recording the new package is
//! up to the calling command.

pub mod detection;
pub mod staging;
pub mod walk;


use std::path::{Path, PathBuf};

use console::Style;
use tracing::{debug, info, warn};

use crate::archive::Extractor;
use crate::common::fs as fs_utils;
use crate::config::Lockfile;
use crate::error::{RelbinError, Result};
use crate::paths::StatePaths;
use crate::prompt::Prompter;

use staging::StagingDir;

/// Whether the install replaces a package on purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// New install; a name conflict needs the user's consent
    Fresh,
    /// Upgrade of an installed package; a name conflict is expected
    Upgrade,
}

/// Outcome of the conflict scan
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolution {
    /// No installed binary has this name
    Fresh,
    /// Replace the entry at `index`, whose asset lives at `previous_asset`
    Overwrite {
        index: usize,
        previous_asset: PathBuf,
    },
    /// The user declined to replace `binary`
    Abort { binary: String },
}

/// An asset downloaded into `incoming/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Where the file currently sits
    pub staged: PathBuf,
    /// File name it gets under `pkg/`
    pub asset: String,
    /// BLAKE3 hash of the file
    pub hash: String,
}

/// A successful install
#[derive(Debug)]
pub struct Installed {
    /// The lock file, minus any entry the install displaced
    pub lockfile: Lockfile,
    /// Name of the binary now in `bin/`
    pub binary: String,
}

/// Installs downloaded assets into a state directory
pub struct Installer<'a> {
    paths: &'a StatePaths,
    extractor: &'a dyn Extractor,
    prompter: &'a dyn Prompter,
}

impl<'a> Installer<'a> {
    pub fn new(
        paths: &'a StatePaths,
        extractor: &'a dyn Extractor,
        prompter: &'a dyn Prompter,
    ) -> Self {
        Self {
            paths,
            extractor,
            prompter,
        }
    }

    /// Install the binary contained in `download`
    ///
    /// `expected_name` is the name the binary most likely has (usually the
    /// repository name). On [`RelbinError::AbortBinaryOverwrite`] the staged
    /// download and the staging directory are gone, `pkg/` is untouched and
    /// `lockfile` is dropped unchanged.
    pub fn install(
        &self,
        download: &Download,
        expected_name: &str,
        mut lockfile: Lockfile,
        mode: InstallMode,
    ) -> Result<Installed> {
        let staged = download.staged.as_path();
        let staging = StagingDir::create(&self.paths.tmp)?;

        self.extractor.extract(staged, staging.path())?;
        debug!("Extracted {} into staging", staged.display());

        let files = walk::walk(staging.path())?;
        if files.is_empty() {
            return Err(RelbinError::BinaryNotFound {
                path: staged.display().to_string(),
            });
        }

        let located = detection::locate(&files, expected_name, self.prompter)?;
        debug!(
            "Located binary '{}' at {} ({:?})",
            located.name,
            located.path.display(),
            located.rule
        );

        let resolution = self.resolve(&located.name, &lockfile, staged, mode)?;
        debug!("Conflict check for '{}': {:?}", located.name, resolution);

        let asset_path = self.paths.asset_path(&download.asset);
        match resolution {
            Resolution::Fresh => {}
            Resolution::Overwrite {
                index,
                previous_asset,
            } => {
                if previous_asset != asset_path {
                    fs_utils::remove_path(&previous_asset)?;
                }
                if mode == InstallMode::Fresh {
                    lockfile.packages.remove(index);
                }
            }
            Resolution::Abort { binary } => {
                fs_utils::remove_path(staged)?;
                staging.remove()?;
                return Err(RelbinError::AbortBinaryOverwrite { binary });
            }
        }

        let target = self.paths.binary_path(&located.name);
        fs_utils::copy_executable(&located.path, &target)?;
        fs_utils::move_file(staged, &asset_path)?;
        staging.remove()?;

        info!("Installed {}", target.display());
        Ok(Installed {
            lockfile,
            binary: located.name,
        })
    }

    fn resolve(
        &self,
        binary: &str,
        lockfile: &Lockfile,
        staged: &Path,
        mode: InstallMode,
    ) -> Result<Resolution> {
        let Some(index) = lockfile.position_by_binary(binary) else {
            return Ok(Resolution::Fresh);
        };
        let existing = &lockfile.packages[index];

        let overwrite = match mode {
            InstallMode::Upgrade => true,
            InstallMode::Fresh => {
                let question = Style::new().yellow().apply_to(format!(
                    "The binary {} version: {} is already installed, would you like to overwrite it?",
                    existing.binary, existing.tag
                ));
                match self.prompter.confirm(&question.to_string()) {
                    Ok(answer) => answer,
                    Err(e) => {
                        if let Err(cleanup) = fs_utils::remove_path(staged) {
                            warn!("Failed to remove {}: {}", staged.display(), cleanup);
                        }
                        return Err(e);
                    }
                }
            }
        };

        Ok(if overwrite {
            Resolution::Overwrite {
                index,
                previous_asset: self.paths.asset_path(&existing.asset),
            }
        } else {
            Resolution::Abort {
                binary: binary.to_string(),
            }
        })
    }
}
