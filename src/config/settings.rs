//! User settings (`config.yaml` in the state directory)
//!
//! Every field is optional; a missing file means defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RelbinError, Result};

/// Default GitHub REST API endpoint
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable that overrides `github_token`
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Settings read from `config.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the GitHub REST API (GitHub Enterprise installs differ)
    pub github_api_url: String,

    /// Token sent as a bearer credential to the GitHub API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    /// HTTP timeout for API calls and downloads
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            github_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let yaml = fs::read_to_string(path).map_err(|e| RelbinError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&yaml).map_err(|e| match e {
            RelbinError::ConfigParseFailed { reason, .. } => RelbinError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        let token = std::env::var(GITHUB_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty());
        self.with_token_override(token)
    }

    fn with_token_override(mut self, token: Option<String>) -> Self {
        if token.is_some() {
            self.github_token = token;
        }
        self
    }
}
