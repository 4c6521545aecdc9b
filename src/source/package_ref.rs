//! Package reference parsing
//!
//! Turns the raw string a user typed into structured coordinates. Parsing is
//! pure string work: nothing here touches the network or the filesystem.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::archive;
use crate::error::{RelbinError, Result};

/// `owner/repo` with an optional `@tag` and `::asset` suffix, after trimming
#[allow(clippy::expect_used)]
static GITHUB_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+(@[^\s@/:]+(::[^\s/]+)?)?$")
        .expect("github reference pattern is valid")
});

/// GitHub release coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubRef {
    pub owner: String,
    pub repo: String,

    /// Release tag; latest release when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Asset file name within the release; detected when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
}

/// A parsed package reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PackageReference {
    /// Release asset hosted on GitHub
    GitHub(GitHubRef),
    /// Direct download URL
    Url {
        /// The URL exactly as given
        url: String,
        /// Final path segment of the URL
        asset: String,
    },
}

impl PackageReference {
    /// Parse a package reference from a string
    ///
    /// Supported formats:
    /// - `owner/repo` - latest release of a GitHub repository
    /// - `@owner/repo`, `github:owner/repo` - same, with a prefix
    /// - `owner/repo@tag` - a specific release
    /// - `owner/repo@tag::asset` - a specific asset of a specific release
    /// - `https://host/path/asset` - a direct download URL
    /// - `file:///path/asset` - a local file, treated like a download
    ///
    /// GitHub coordinates are tried first, then URLs.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(RelbinError::EmptyInput);
        }

        if let Some(github) = Self::parse_github(input)? {
            return Ok(PackageReference::GitHub(github));
        }

        if let Some(reference) = Self::parse_url(input) {
            return Ok(reference);
        }

        Err(RelbinError::UnrecognizedInput {
            input: input.to_string(),
        })
    }

    /// Parse GitHub short-form, returning `None` when the input has another shape
    fn parse_github(input: &str) -> Result<Option<GitHubRef>> {
        let without_prefix = input.strip_prefix("github:").unwrap_or(input);
        let trimmed = without_prefix.trim_matches(|c| matches!(c, '/' | '@' | ':'));

        if !GITHUB_PATTERN.is_match(trimmed) {
            return Ok(None);
        }

        let (owner_and_repo, tag_and_asset) = match trimmed.split_once('@') {
            Some((head, tail)) => (head, Some(tail)),
            None => (trimmed, None),
        };

        let Some((owner, repo)) = owner_and_repo.split_once('/') else {
            return Err(RelbinError::UnrecognizedInput {
                input: input.to_string(),
            });
        };
        if owner.is_empty() || repo.is_empty() {
            return Err(RelbinError::UnrecognizedInput {
                input: input.to_string(),
            });
        }

        let (tag, asset) = match tag_and_asset {
            Some(rest) => match rest.split_once("::") {
                Some((tag, asset)) => (Some(tag), Some(asset).filter(|a| !a.is_empty())),
                None => (Some(rest), None),
            },
            None => (None, None),
        };

        Ok(Some(GitHubRef {
            owner: owner.to_string(),
            repo: repo.to_string(),
            tag: tag.map(str::to_string),
            asset: asset.map(str::to_string),
        }))
    }

    /// Parse a download URL, returning `None` unless it has a usable asset name
    fn parse_url(input: &str) -> Option<Self> {
        let url = Url::parse(input).ok()?;

        match url.scheme() {
            "http" | "https" => {
                url.host_str()?;
            }
            "file" => {}
            _ => return None,
        }

        let asset = url
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .next_back()?
            .to_string();

        Some(PackageReference::Url {
            url: input.to_string(),
            asset,
        })
    }

    /// Check if this is a GitHub reference
    #[allow(dead_code)] // Used by tests
    pub fn is_github(&self) -> bool {
        matches!(self, PackageReference::GitHub(_))
    }

    /// Check if this is a direct URL reference
    #[allow(dead_code)] // Used by tests
    pub fn is_url(&self) -> bool {
        matches!(self, PackageReference::Url { .. })
    }

    /// The name the installed binary is expected to have
    ///
    /// For GitHub references this is the repository name. For URLs it is the
    /// asset name with archive extensions removed.
    pub fn expected_binary_name(&self) -> String {
        match self {
            PackageReference::GitHub(github) => github.repo.clone(),
            PackageReference::Url { asset, .. } => {
                archive::strip_archive_extensions(asset).to_string()
            }
        }
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageReference::GitHub(github) => {
                write!(f, "{}/{}", github.owner, github.repo)?;
                if let Some(tag) = &github.tag {
                    write!(f, "@{tag}")?;
                }
                if let Some(asset) = &github.asset {
                    write!(f, "::{asset}")?;
                }
                Ok(())
            }
            PackageReference::Url { url, .. } => f.write_str(url),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn github(input: &str) -> GitHubRef {
        match PackageReference::parse(input).unwrap() {
            PackageReference::GitHub(github) => github,
            other => panic!("Expected GitHub reference, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_owner_repo() {
        let parsed = github("owner/repo");
        assert_eq!(parsed.owner, "owner");
        assert_eq!(parsed.repo, "repo");
        assert_eq!(parsed.tag, None);
        assert_eq!(parsed.asset, None);
    }

    #[test]
    fn test_parse_with_tag() {
        let parsed = github("owner/repo@v1.0");
        assert_eq!(parsed.tag.as_deref(), Some("v1.0"));
        assert_eq!(parsed.asset, None);
    }

    #[test]
    fn test_parse_with_tag_and_asset() {
        let parsed = github("owner/repo@v1.0::asset.tar.gz");
        assert_eq!(parsed.owner, "owner");
        assert_eq!(parsed.repo, "repo");
        assert_eq!(parsed.tag.as_deref(), Some("v1.0"));
        assert_eq!(parsed.asset.as_deref(), Some("asset.tar.gz"));
    }

    #[test]
    fn test_parse_trims_surrounding_separators() {
        assert_eq!(github("/owner/repo/"), github("owner/repo"));
        assert_eq!(github("@owner/repo"), github("owner/repo"));
        assert_eq!(github("owner/repo@v2::"), github("owner/repo@v2"));
        assert_eq!(github("  owner/repo@v2  "), github("owner/repo@v2"));
    }

    #[test]
    fn test_parse_github_prefix() {
        let parsed = github("github:BurntSushi/ripgrep@14.1.0");
        assert_eq!(parsed.owner, "BurntSushi");
        assert_eq!(parsed.repo, "ripgrep");
        assert_eq!(parsed.tag.as_deref(), Some("14.1.0"));
    }

    #[test]
    fn test_parse_url() {
        let parsed = PackageReference::parse("https://x/y/z.tar.gz").unwrap();
        assert_eq!(
            parsed,
            PackageReference::Url {
                url: "https://x/y/z.tar.gz".to_string(),
                asset: "z.tar.gz".to_string(),
            }
        );
        assert!(parsed.is_url());
        assert!(!parsed.is_github());
    }

    #[test]
    fn test_parse_file_url() {
        let parsed = PackageReference::parse("file:///tmp/mirror/tool.zip").unwrap();
        assert!(parsed.is_url());
        assert_eq!(parsed.expected_binary_name(), "tool");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(
            PackageReference::parse(""),
            Err(RelbinError::EmptyInput)
        ));
        assert!(matches!(
            PackageReference::parse("   "),
            Err(RelbinError::EmptyInput)
        ));
    }

    #[test]
    fn test_parse_unrecognized_input() {
        assert!(matches!(
            PackageReference::parse("not a valid ref !!"),
            Err(RelbinError::UnrecognizedInput { .. })
        ));
    }

    #[test]
    fn test_parse_missing_slash_is_rejected() {
        for input in ["ownerrepo", "ownerrepo@v1", "@v1::asset", "ftp://host/file.tar"] {
            assert!(
                matches!(
                    PackageReference::parse(input),
                    Err(RelbinError::UnrecognizedInput { .. })
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_url_without_asset_is_rejected() {
        assert!(PackageReference::parse("https://example.com/").is_err());
    }

    #[test]
    fn test_parse_is_pure() {
        for input in ["owner/repo@v1::a.zip", "https://x/y/z.tar.gz"] {
            assert_eq!(
                PackageReference::parse(input).unwrap(),
                PackageReference::parse(input).unwrap()
            );
        }
    }

    #[test]
    fn test_expected_binary_name() {
        let parsed = PackageReference::parse("sharkdp/fd@v10.0.0").unwrap();
        assert_eq!(parsed.expected_binary_name(), "fd");

        let parsed = PackageReference::parse("https://x/dl/jq.tar.gz").unwrap();
        assert_eq!(parsed.expected_binary_name(), "jq");
    }

    #[test]
    fn test_display_round_trips_github_form() {
        let parsed = PackageReference::parse("@owner/repo@v1::a.zip").unwrap();
        assert_eq!(parsed.to_string(), "owner/repo@v1::a.zip");
    }
}
