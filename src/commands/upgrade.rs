//! Upgrade command implementation
//!
//! Moves GitHub installs to their latest release. The replacement entry takes
//! the old entry's place in the lock file.

use std::path::PathBuf;

use console::Style;
use tracing::debug;

use crate::cli::UpgradeArgs;
use crate::commands::helpers::{Context, Session};
use crate::common::fs as fs_utils;
use crate::config::{InstalledPackage, Lockfile, PackageSource};
use crate::error::{RelbinError, Result};
use crate::github::assets::{self, Platform};
use crate::installer::InstallMode;
use crate::prompt::InquirePrompter;

/// What happened to one binary
#[derive(Debug)]
pub enum UpgradeOutcome {
    Upgraded {
        lockfile: Lockfile,
        previous_tag: String,
        package: InstalledPackage,
    },
    UpToDate(InstalledPackage),
}

/// Run upgrade command
pub fn run(home: Option<PathBuf>, args: UpgradeArgs) -> Result<()> {
    let session = Session::open(home)?;
    let (github, downloader) = session.remote()?;
    let ctx = Context {
        paths: &session.paths,
        releases: &github,
        downloader: &downloader,
        prompter: &InquirePrompter,
        platform: Platform::current(),
    };

    let mut lockfile = session.load_lockfile()?;

    let targets: Vec<String> = if args.all {
        lockfile
            .packages
            .iter()
            .filter(|p| p.source == PackageSource::GitHub)
            .map(|p| p.binary.clone())
            .collect()
    } else {
        args.binaries
    };

    if targets.is_empty() {
        println!("Nothing to upgrade.");
        return Ok(());
    }

    for binary in &targets {
        match upgrade_binary(&ctx, binary, &lockfile)? {
            UpgradeOutcome::Upgraded {
                lockfile: updated,
                previous_tag,
                package,
            } => {
                session.save_lockfile(&updated)?;
                lockfile = updated;
                println!(
                    "{} {} {} -> {}",
                    Style::new().green().bold().apply_to("Upgraded"),
                    Style::new().bold().apply_to(&package.binary),
                    previous_tag,
                    package.tag
                );
            }
            UpgradeOutcome::UpToDate(package) => {
                println!(
                    "{} is already up to date ({})",
                    Style::new().bold().apply_to(&package.binary),
                    package.tag
                );
            }
        }
    }

    Ok(())
}

/// Upgrade the package that installed `binary`
pub fn upgrade_binary(
    ctx: &Context<'_>,
    binary: &str,
    lockfile: &Lockfile,
) -> Result<UpgradeOutcome> {
    let index = lockfile
        .position_by_binary(binary)
        .ok_or_else(|| RelbinError::PackageNotInstalled {
            name: binary.to_string(),
        })?;
    let current = &lockfile.packages[index];

    if current.source != PackageSource::GitHub {
        return Err(RelbinError::UpgradeUnsupported {
            binary: binary.to_string(),
        });
    }

    let release = ctx.fetch_release(&current.owner, &current.repo, None)?;
    if release.tag_name == current.tag {
        return Ok(UpgradeOutcome::UpToDate(current.clone()));
    }
    debug!("Upgrading {} from {} to {}", binary, current.tag, release.tag_name);

    let asset = assets::upgrade_asset(
        &release,
        &current.asset,
        &current.tag,
        &ctx.platform,
        ctx.prompter,
    )?;

    let download = ctx.fetch_asset(&asset.browser_download_url, &asset.name)?;
    let installed = ctx.installer().install(
        &download,
        &current.repo,
        lockfile.clone(),
        InstallMode::Upgrade,
    )?;

    if installed.binary != current.binary {
        fs_utils::remove_path(&ctx.paths.binary_path(&current.binary))?;
    }
    if asset.name != current.asset {
        fs_utils::remove_path(&ctx.paths.asset_path(&current.asset))?;
    }

    let package = InstalledPackage {
        tag: release.tag_name.clone(),
        asset: asset.name,
        url: asset.browser_download_url,
        binary: installed.binary,
        ..current.clone()
    }
    .with_hash(download.hash);

    let mut updated = installed.lockfile;
    updated.replace_at(index, package.clone());

    Ok(UpgradeOutcome::Upgraded {
        lockfile: updated,
        previous_tag: current.tag.clone(),
        package,
    })
}
