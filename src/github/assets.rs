//! Release asset selection
//!
//! Narrows a release's assets down to the one built for this machine:
//! checksums and signatures are dropped, then the host OS and architecture
//! are matched against common spellings in the file name. Whatever cannot be
//! narrowed to a single asset is left to the user.

use crate::error::{RelbinError, Result};
use crate::prompt::Prompter;

use super::{Release, ReleaseAsset};

pub const SELECT_ASSET_MESSAGE: &str =
    "Could not automatically detect the release asset. Please select it manually:";

/// Suffixes of release files that are never the program itself
const METADATA_SUFFIXES: &[&str] = &[
    ".sha256", ".sha256sum", ".sha512", ".sha1", ".md5", ".sig", ".asc", ".pem", ".crt", ".sbom",
    ".spdx", ".json", ".txt", ".deb", ".rpm", ".apk", ".msi", ".dmg", ".pkg",
];

/// Host platform as reported by the standard library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: &'static str,
    pub arch: &'static str,
}

impl Platform {
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }

    fn os_aliases(&self) -> &'static [&'static str] {
        match self.os {
            "linux" => &["linux"],
            "macos" => &["darwin", "macos", "apple", "osx"],
            "windows" => &["windows", "win64", "win"],
            _ => &[],
        }
    }

    fn arch_aliases(&self) -> &'static [&'static str] {
        match self.arch {
            "x86_64" => &["x86_64", "amd64", "x64"],
            "aarch64" => &["aarch64", "arm64"],
            _ => &[],
        }
    }

    /// OS names are matched as whole words so "win" does not hit "darwin"
    fn matches_os(&self, asset_name: &str) -> bool {
        let name = asset_name.to_ascii_lowercase();
        let aliases = self.os_aliases();
        name.split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| aliases.contains(&word) || word == self.os)
    }

    fn matches_arch(&self, asset_name: &str) -> bool {
        let name = asset_name.to_ascii_lowercase();
        name.contains(self.arch) || self.arch_aliases().iter().any(|alias| name.contains(alias))
    }
}

fn is_metadata(asset: &ReleaseAsset) -> bool {
    let name = asset.name.to_ascii_lowercase();
    name.contains("checksums") || METADATA_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Pick the asset to install from `release`
///
/// A `requested` asset name must exist in the release.
pub fn select_asset(
    release: &Release,
    requested: Option<&str>,
    platform: &Platform,
    prompter: &dyn Prompter,
) -> Result<ReleaseAsset> {
    match requested {
        Some(name) => release
            .asset(name)
            .cloned()
            .ok_or_else(|| RelbinError::AssetNotFound {
                asset: name.to_string(),
                tag: release.tag_name.clone(),
            }),
        None => detect_asset(release, platform, prompter),
    }
}

/// Pick the asset that replaces `previous_asset` in a newer release
///
/// Asset names usually embed the version, so the previous name with the old
/// tag swapped for the new one is tried first.
pub fn upgrade_asset(
    release: &Release,
    previous_asset: &str,
    previous_tag: &str,
    platform: &Platform,
    prompter: &dyn Prompter,
) -> Result<ReleaseAsset> {
    renamed_candidates(previous_asset, previous_tag, &release.tag_name)
        .iter()
        .find_map(|name| release.asset(name).cloned())
        .map_or_else(|| detect_asset(release, platform, prompter), Ok)
}

fn renamed_candidates(previous_asset: &str, previous_tag: &str, new_tag: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    if !previous_tag.is_empty() {
        candidates.push(previous_asset.replace(previous_tag, new_tag));

        let old_version = previous_tag.trim_start_matches('v');
        let new_version = new_tag.trim_start_matches('v');
        if !old_version.is_empty() && old_version != previous_tag {
            candidates.push(previous_asset.replace(old_version, new_version));
        }
    }

    candidates.push(previous_asset.to_string());
    candidates
}

fn detect_asset(
    release: &Release,
    platform: &Platform,
    prompter: &dyn Prompter,
) -> Result<ReleaseAsset> {
    let installable: Vec<&ReleaseAsset> =
        release.assets.iter().filter(|a| !is_metadata(a)).collect();

    if installable.is_empty() {
        return Err(RelbinError::AssetNotFound {
            asset: format!("{}/{}", platform.os, platform.arch),
            tag: release.tag_name.clone(),
        });
    }

    let for_os: Vec<&ReleaseAsset> = installable
        .iter()
        .copied()
        .filter(|a| platform.matches_os(&a.name))
        .collect();

    let narrowed = if for_os.len() > 1 {
        let for_arch: Vec<&ReleaseAsset> = for_os
            .iter()
            .copied()
            .filter(|a| platform.matches_arch(&a.name))
            .collect();
        if for_arch.is_empty() { for_os } else { for_arch }
    } else {
        for_os
    };

    if let [only] = narrowed.as_slice() {
        return Ok((*only).clone());
    }

    let options = if narrowed.is_empty() {
        &installable
    } else {
        &narrowed
    };
    let names: Vec<String> = options.iter().map(|a| a.name.clone()).collect();
    let chosen = prompter.select(SELECT_ASSET_MESSAGE, &names)?;

    options
        .iter()
        .find(|a| a.name == chosen)
        .map(|a| (*a).clone())
        .ok_or_else(|| RelbinError::AssetNotFound {
            asset: chosen,
            tag: release.tag_name.clone(),
        })
}
