//! Uninstall command implementation
//!
//! Removes the binary from `bin/`, its asset from `pkg/` and its lock file
//! entry. Every name is checked before anything is removed.

use std::path::PathBuf;

use console::Style;
use tracing::debug;

use crate::cli::UninstallArgs;
use crate::commands::helpers::Session;
use crate::common::fs as fs_utils;
use crate::config::{InstalledPackage, Lockfile};
use crate::error::{RelbinError, Result};
use crate::paths::StatePaths;

/// Run uninstall command
pub fn run(home: Option<PathBuf>, args: UninstallArgs) -> Result<()> {
    let session = Session::open(home)?;
    let mut lockfile = session.load_lockfile()?;

    let targets: Vec<String> = if args.all {
        lockfile.packages.iter().map(|p| p.binary.clone()).collect()
    } else {
        args.binaries
    };

    if targets.is_empty() {
        println!("No binaries installed.");
        return Ok(());
    }

    let removed = uninstall(&session.paths, &mut lockfile, &targets)?;
    session.save_lockfile(&lockfile)?;

    for package in removed {
        println!(
            "{} {} ({})",
            Style::new().green().bold().apply_to("Uninstalled"),
            Style::new().bold().apply_to(&package.binary),
            package.origin()
        );
    }

    Ok(())
}

/// Remove `binaries` from disk and from `lockfile`
pub fn uninstall(
    paths: &StatePaths,
    lockfile: &mut Lockfile,
    binaries: &[String],
) -> Result<Vec<InstalledPackage>> {
    if let Some(unknown) = binaries
        .iter()
        .find(|binary| lockfile.find_by_binary(binary).is_none())
    {
        return Err(RelbinError::PackageNotInstalled {
            name: unknown.clone(),
        });
    }

    let mut removed = Vec::new();
    for binary in binaries {
        let Some(package) = lockfile.remove_package(binary) else {
            // listed twice
            continue;
        };

        fs_utils::remove_path(&paths.binary_path(&package.binary))?;
        fs_utils::remove_path(&paths.asset_path(&package.asset))?;
        debug!("Removed {} and {}", package.binary, package.asset);
        removed.push(package);
    }

    Ok(removed)
}
