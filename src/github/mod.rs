//! GitHub release lookups
//!
//! Resolves `owner/repo[@tag]` to a concrete release through the REST API
//! and picks the asset to download (see [`assets`]).

pub mod assets;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use crate::config::Settings;
use crate::error::{RelbinError, Result};

/// Release metadata returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// One downloadable file attached to a release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

impl Release {
    pub fn asset(&self, name: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|asset| asset.name == name)
    }
}

/// Looks up releases of a repository
pub trait ReleaseSource {
    /// The release tagged `tag`, or the latest release when `tag` is `None`
    fn release(&self, owner: &str, repo: &str, tag: Option<&str>) -> Result<Release>;
}

/// Thin client for the releases endpoints
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(client: Client, settings: &Settings) -> Self {
        Self {
            client,
            api_url: settings.github_api_url.trim_end_matches('/').to_string(),
            token: settings.github_token.clone(),
        }
    }
}

impl ReleaseSource for GitHubClient {
    fn release(&self, owner: &str, repo: &str, tag: Option<&str>) -> Result<Release> {
        let url = release_url(&self.api_url, owner, repo, tag);
        debug!("Fetching release metadata from {}", url);

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| RelbinError::GitHubApi {
            message: format!("{url}: {e}"),
        })?;

        match response.status() {
            status if status.is_success() => {
                response.json::<Release>().map_err(|e| RelbinError::GitHubApi {
                    message: format!("Invalid release data from {url}: {e}"),
                })
            }
            StatusCode::NOT_FOUND => Err(RelbinError::ReleaseNotFound {
                repo: format!("{owner}/{repo}"),
                tag: tag.unwrap_or("latest").to_string(),
            }),
            status => Err(RelbinError::GitHubApi {
                message: format!("HTTP {} from {url}", status.as_u16()),
            }),
        }
    }
}

fn release_url(api_url: &str, owner: &str, repo: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("{api_url}/repos/{owner}/{repo}/releases/tags/{tag}"),
        None => format!("{api_url}/repos/{owner}/{repo}/releases/latest"),
    }
}
