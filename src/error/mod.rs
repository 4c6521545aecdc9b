//! Error types and handling for relbin
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Variants are grouped by the area that raises them:
//! - input: reference parsing
//! - network: release lookups and downloads
//! - fs: state directory, walking, copying
//! - select: binary detection and prompts
//! - conflict: overwrite decisions
//! - archive: extraction

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for relbin operations
#[derive(Error, Diagnostic, Debug)]
pub enum RelbinError {
    // Input errors
    #[error("No package reference given")]
    #[diagnostic(
        code(relbin::input::empty),
        help("Pass a GitHub reference like owner/repo@tag or a download URL")
    )]
    EmptyInput,

    #[error("Unrecognized package reference: {input}")]
    #[diagnostic(
        code(relbin::input::unrecognized),
        help("Valid formats: owner/repo, owner/repo@tag, owner/repo@tag::asset, https://host/path/asset")
    )]
    UnrecognizedInput { input: String },

    // Network errors
    #[error("Download of {url} failed with HTTP status {status}")]
    #[diagnostic(code(relbin::network::status))]
    DownloadStatus { url: String, status: u16 },

    #[error("Failed to download {url}: {reason}")]
    #[diagnostic(
        code(relbin::network::transport),
        help("Check your network connection and the URL")
    )]
    DownloadFailed { url: String, reason: String },

    #[error("GitHub API request failed: {message}")]
    #[diagnostic(
        code(relbin::network::github),
        help("Set GITHUB_TOKEN if you are hitting the anonymous rate limit")
    )]
    GitHubApi { message: String },

    #[error("No release '{tag}' found for {repo}")]
    #[diagnostic(code(relbin::network::release_not_found))]
    ReleaseNotFound { repo: String, tag: String },

    #[error("Asset '{asset}' not found in release {tag}")]
    #[diagnostic(
        code(relbin::network::asset_not_found),
        help("Omit the ::asset suffix to pick an asset automatically")
    )]
    AssetNotFound { asset: String, tag: String },

    // File system errors
    #[error("State directory not found: {path}")]
    #[diagnostic(
        code(relbin::fs::state_not_found),
        help("Run 'relbin init' to create it, or point RELBIN_HOME at an existing directory")
    )]
    StatePathNotFound { path: String },

    #[error("State directory is locked: {reason}")]
    #[diagnostic(
        code(relbin::fs::locked),
        help("Wait for the other process to finish or remove the .lock file manually")
    )]
    StateLocked { reason: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(relbin::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(relbin::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(relbin::fs::io_error))]
    IoError { message: String },

    // Selection errors
    #[error("Could not find a binary in {path}")]
    #[diagnostic(code(relbin::select::binary_not_found))]
    BinaryNotFound { path: String },

    #[error("Prompt failed: {message}")]
    #[diagnostic(code(relbin::select::prompt_failed))]
    PromptFailed { message: String },

    // Conflict outcome
    #[error("Overwrite of binary '{binary}' declined, nothing was installed")]
    #[diagnostic(code(relbin::conflict::aborted))]
    AbortBinaryOverwrite { binary: String },

    // Archive errors
    #[error("Failed to extract {path}: {reason}")]
    #[diagnostic(code(relbin::archive::extraction_failed))]
    ExtractionFailed { path: String, reason: String },

    #[error("Unsupported archive format: {path}")]
    #[diagnostic(
        code(relbin::archive::unsupported),
        help("Supported archives: .tar, .zip and .gz, .xz, .zst, .bz2, .br, .lz4, .sz (alone or as .tar.*); .rar is not supported")
    )]
    UnsupportedArchive { path: String },

    // Configuration errors
    #[error("Failed to parse lock file: {path}: {reason}")]
    #[diagnostic(
        code(relbin::config::lockfile_parse_failed),
        help("The lock file is JSON; fix or remove it")
    )]
    LockfileParseFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(relbin::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    // Command errors
    #[error("Package '{name}' is not installed")]
    #[diagnostic(
        code(relbin::package::not_installed),
        help("Run 'relbin list' to see installed binaries")
    )]
    PackageNotInstalled { name: String },

    #[error("Binary '{binary}' was installed from a URL and cannot be upgraded")]
    #[diagnostic(
        code(relbin::package::upgrade_unsupported),
        help("Reinstall it from a newer URL instead")
    )]
    UpgradeUnsupported { binary: String },
}

impl RelbinError {
    /// Whether this error is the deliberate "user declined overwrite" outcome
    pub fn is_abort(&self) -> bool {
        matches!(self, RelbinError::AbortBinaryOverwrite { .. })
    }
}

impl From<std::io::Error> for RelbinError {
    fn from(err: std::io::Error) -> Self {
        RelbinError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<walkdir::Error> for RelbinError {
    fn from(err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        RelbinError::FileReadFailed {
            path,
            reason: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for RelbinError {
    fn from(err: serde_yaml::Error) -> Self {
        RelbinError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RelbinError {
    fn from(err: serde_json::Error) -> Self {
        RelbinError::LockfileParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for RelbinError {
    fn from(err: inquire::InquireError) -> Self {
        RelbinError::PromptFailed {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for RelbinError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(ToString::to_string).unwrap_or_default();
        match err.status() {
            Some(status) => RelbinError::DownloadStatus {
                url,
                status: status.as_u16(),
            },
            None => RelbinError::DownloadFailed {
                url,
                reason: err.to_string(),
            },
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, RelbinError>;
