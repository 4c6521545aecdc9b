//! Command helper utilities

use std::path::PathBuf;

use reqwest::blocking::Client;
use tracing::debug;

use crate::archive::ArchiveExtractor;
use crate::config::{Lockfile, Settings};
use crate::download::{self, Downloader, HttpDownloader};
use crate::error::Result;
use crate::github::assets::Platform;
use crate::github::{GitHubClient, Release, ReleaseSource};
use crate::hash;
use crate::installer::{Download, Installer};
use crate::paths::{StateGuard, StatePaths};
use crate::progress;
use crate::prompt::Prompter;

/// An open state directory, locked for the lifetime of the value
pub struct Session {
    pub paths: StatePaths,
    pub settings: Settings,
    _guard: StateGuard,
}

impl Session {
    /// Open the state directory for a read-modify-write command
    pub fn open(home: Option<PathBuf>) -> Result<Self> {
        let paths = StatePaths::discover(home)?;
        let guard = StateGuard::acquire(&paths)?;
        let settings = Settings::load(&paths.config)?.with_env_overrides();
        debug!("Settings: api {}, timeout {}s", settings.github_api_url, settings.timeout_secs);

        Ok(Self {
            paths,
            settings,
            _guard: guard,
        })
    }

    pub fn load_lockfile(&self) -> Result<Lockfile> {
        Lockfile::load(&self.paths.lockfile)
    }

    pub fn save_lockfile(&self, lockfile: &Lockfile) -> Result<()> {
        lockfile.save(&self.paths.lockfile)
    }

    /// HTTP collaborators sharing one client
    pub fn remote(&self) -> Result<(GitHubClient, HttpDownloader)> {
        let client: Client = download::http_client(&self.settings)?;
        Ok((
            GitHubClient::new(client.clone(), &self.settings),
            HttpDownloader::new(client),
        ))
    }
}

/// Collaborators a command needs to resolve, fetch and install packages
pub struct Context<'a> {
    pub paths: &'a StatePaths,
    pub releases: &'a dyn ReleaseSource,
    pub downloader: &'a dyn Downloader,
    pub prompter: &'a dyn Prompter,
    pub platform: Platform,
}

impl<'a> Context<'a> {
    pub fn installer(&self) -> Installer<'_> {
        Installer::new(self.paths, &ArchiveExtractor, self.prompter)
    }

    /// Fetch release metadata behind a spinner
    pub fn fetch_release(&self, owner: &str, repo: &str, tag: Option<&str>) -> Result<Release> {
        let spinner = progress::spinner(&format!("Fetching release info for {owner}/{repo}"));
        let release = self.releases.release(owner, repo, tag);
        spinner.finish_and_clear();
        release
    }

    /// Download `url` into `incoming/<asset>` and hash it
    ///
    /// The installer moves the file into `pkg/` once the install goes ahead.
    pub fn fetch_asset(&self, url: &str, asset: &str) -> Result<Download> {
        let staged = self
            .downloader
            .download(url, &self.paths.incoming_path(asset))?;
        let hash = hash::hash_file(&staged)?;
        Ok(Download {
            staged,
            asset: asset.to_string(),
            hash,
        })
    }
}
