//! Lock file (relbin.lock) main module
//!
//! The lock file records every installed package in installation order.
//! It is loaded once at the start of a command, threaded through the install
//! engine as a plain value, and saved at the end.
//!
//! Invariant: no two entries share a `binary` name.

pub mod package;


use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RelbinError, Result};

pub use package::{InstalledPackage, PackageSource};

/// Lock file structure (relbin.lock)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lockfile {
    /// Installed packages in installation order
    #[serde(default)]
    pub packages: Vec<InstalledPackage>,
}

impl Lockfile {
    /// Create a new, empty lock file
    pub fn new() -> Self {
        Self {
            packages: Vec::new(),
        }
    }

    /// Load the lock file at `path`; a missing file is an empty lock file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let json = fs::read_to_string(path).map_err(|e| RelbinError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_json(&json).map_err(|e| match e {
            RelbinError::LockfileParseFailed { reason, .. } => RelbinError::LockfileParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse lock file from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::new());
        }

        serde_json::from_str(json).map_err(|e| RelbinError::LockfileParseFailed {
            path: "relbin.lock".to_string(),
            reason: e.to_string(),
        })
    }

    /// Serialize lock file to JSON string (pretty-printed)
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the lock file atomically: temp file in the same directory, then rename
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let write_failed = |e: &dyn std::fmt::Display| RelbinError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_failed(&e))?;
        temp.write_all(json.as_bytes())
            .map_err(|e| write_failed(&e))?;
        temp.persist(path).map_err(|e| write_failed(&e.error))?;

        Ok(())
    }

    /// Find the entry that installed `binary`
    pub fn find_by_binary(&self, binary: &str) -> Option<&InstalledPackage> {
        self.packages.iter().find(|p| p.binary == binary)
    }

    /// Index of the entry that installed `binary`
    pub fn position_by_binary(&self, binary: &str) -> Option<usize> {
        self.packages.iter().position(|p| p.binary == binary)
    }

    /// Find an entry installed from the same source at the same tag
    pub fn find_same_release(&self, candidate: &InstalledPackage) -> Option<&InstalledPackage> {
        self.packages
            .iter()
            .find(|p| p.is_same_release(candidate))
    }

    /// Add a package, replacing in place any entry with the same binary name
    pub fn add_package(&mut self, package: InstalledPackage) {
        match self.position_by_binary(&package.binary) {
            Some(index) => self.packages[index] = package,
            None => self.packages.push(package),
        }
    }

    /// Replace the entry at `index`, keeping its position
    ///
    /// Any other entry already using the new binary name is dropped so the
    /// uniqueness invariant holds.
    pub fn replace_at(&mut self, index: usize, package: InstalledPackage) {
        if index >= self.packages.len() {
            self.add_package(package);
            return;
        }

        let binary = package.binary.clone();
        self.packages[index] = package;

        let mut position = 0;
        self.packages.retain(|p| {
            let keep = position == index || p.binary != binary;
            position += 1;
            keep
        });
    }

    /// Remove the entry that installed `binary`
    pub fn remove_package(&mut self, binary: &str) -> Option<InstalledPackage> {
        let index = self.position_by_binary(binary)?;
        Some(self.packages.remove(index))
    }

    /// Check whether any binary name appears more than once
    #[allow(dead_code)] // Used by tests
    pub fn has_unique_binaries(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.packages.iter().all(|p| seen.insert(p.binary.as_str()))
    }
}
