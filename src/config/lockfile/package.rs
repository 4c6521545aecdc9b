//! `InstalledPackage` struct for the lock file
//!
//! One installed binary and where it came from.

use serde::{Deserialize, Serialize};

use crate::source::PackageReference;

/// Where an installed package was downloaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageSource {
    GitHub,
    Url,
}

/// An installed package in the lock file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    /// Where the asset came from
    pub source: PackageSource,

    /// GitHub owner (empty for URL installs)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner: String,

    /// GitHub repository (empty for URL installs)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo: String,

    /// Release tag (empty for URL installs)
    #[serde(default)]
    pub tag: String,

    /// Downloaded asset file name, stored under `pkg/`
    pub asset: String,

    /// Installed binary name, stored under `bin/`
    pub binary: String,

    /// Download URL of the asset
    pub url: String,

    /// BLAKE3 hash of the downloaded asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl InstalledPackage {
    /// Build an entry for a freshly installed release asset
    pub fn from_reference(
        reference: &PackageReference,
        tag: &str,
        asset: &str,
        url: &str,
        binary: &str,
    ) -> Self {
        let (source, owner, repo) = match reference {
            PackageReference::GitHub(github) => (
                PackageSource::GitHub,
                github.owner.clone(),
                github.repo.clone(),
            ),
            PackageReference::Url { .. } => (PackageSource::Url, String::new(), String::new()),
        };

        Self {
            source,
            owner,
            repo,
            tag: tag.to_string(),
            asset: asset.to_string(),
            binary: binary.to_string(),
            url: url.to_string(),
            hash: None,
        }
    }

    /// Set the asset hash
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Whether both entries describe the same source at the same tag
    pub fn is_same_release(&self, other: &InstalledPackage) -> bool {
        match (self.source, other.source) {
            (PackageSource::GitHub, PackageSource::GitHub) => {
                self.owner.eq_ignore_ascii_case(&other.owner)
                    && self.repo.eq_ignore_ascii_case(&other.repo)
                    && self.tag == other.tag
            }
            (PackageSource::Url, PackageSource::Url) => self.url == other.url,
            _ => false,
        }
    }

    /// Human-readable origin, e.g. `owner/repo@tag` or the URL
    pub fn origin(&self) -> String {
        match self.source {
            PackageSource::GitHub => format!("{}/{}@{}", self.owner, self.repo, self.tag),
            PackageSource::Url => self.url.clone(),
        }
    }
}
