//! List command implementation
//!
//! Lists installed binaries with the source they came from.

use std::path::PathBuf;

use console::Style;

use crate::cli::ListArgs;
use crate::config::{InstalledPackage, Lockfile, PackageSource};
use crate::error::Result;
use crate::paths::StatePaths;

/// Run list command
pub fn run(home: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let paths = StatePaths::discover(home)?;
    let lockfile = Lockfile::load(&paths.lockfile)?;

    if lockfile.packages.is_empty() {
        println!("No binaries installed.");
        return Ok(());
    }

    println!("Installed binaries ({}):", lockfile.packages.len());
    println!();

    let width = lockfile
        .packages
        .iter()
        .map(|p| p.binary.len())
        .max()
        .unwrap_or(0);

    for package in &lockfile.packages {
        println!(
            "  {}  {}",
            Style::new()
                .bold()
                .yellow()
                .apply_to(format!("{:width$}", package.binary)),
            source_label(package, args.tags)
        );
    }

    Ok(())
}

fn source_label(package: &InstalledPackage, tags: bool) -> String {
    match package.source {
        PackageSource::GitHub if tags => package.origin(),
        PackageSource::GitHub => format!("{}/{}", package.owner, package.repo),
        PackageSource::Url => package.url.clone(),
    }
}
