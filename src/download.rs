//! Asset downloads
//!
//! Downloads are written to `<dest>.part` and renamed into place once
//! complete, so `pkg/` never holds a truncated asset under its final name.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};
use url::Url;

use crate::config::Settings;
use crate::error::{RelbinError, Result};
use crate::progress::DownloadProgress;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("relbin/", env!("CARGO_PKG_VERSION"));

/// Fetches a URL into a local file
pub trait Downloader {
    /// Download `url` to `dest`, returning the path written
    fn download(&self, url: &str, dest: &Path) -> Result<PathBuf>;
}

/// Build the HTTP client shared by downloads and API calls
pub fn http_client(settings: &Settings) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .map_err(|e| RelbinError::IoError {
            message: format!("Failed to create HTTP client: {e}"),
        })
}

/// Downloader over a blocking reqwest client; `file://` URLs are read locally
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn fetch_remote(&self, url: &str, part: &Path) -> Result<()> {
        let mut response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelbinError::DownloadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let name = url.rsplit('/').next().unwrap_or(url);
        let progress = DownloadProgress::new(response.content_length(), name);
        let result = stream_to_file(&mut response, part, url, &progress);
        match &result {
            Ok(()) => progress.finish(),
            Err(_) => progress.abandon(),
        }
        result
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<PathBuf> {
        info!("Downloading {} to {}", url, dest.display());

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| RelbinError::FileWriteFailed {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let part = part_path(dest);
        let fetched = match local_source(url) {
            Some(source) => copy_local(&source, &part, url),
            None => self.fetch_remote(url, &part),
        };

        if let Err(e) = fetched {
            let _ = fs::remove_file(&part);
            return Err(e);
        }

        fs::rename(&part, dest).map_err(|e| RelbinError::FileWriteFailed {
            path: dest.display().to_string(),
            reason: format!("rename from {} failed: {e}", part.display()),
        })?;

        debug!("Downloaded {}", dest.display());
        Ok(dest.to_path_buf())
    }
}

/// `dest` with `.part` appended to the full file name
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Local path behind a `file://` URL
fn local_source(url: &str) -> Option<PathBuf> {
    let parsed = Url::parse(url).ok()?;
    if parsed.scheme() != "file" {
        return None;
    }
    parsed.to_file_path().ok()
}

fn copy_local(source: &Path, part: &Path, url: &str) -> Result<()> {
    fs::copy(source, part)
        .map(|_| ())
        .map_err(|e| RelbinError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

fn stream_to_file(
    reader: &mut impl Read,
    part: &Path,
    url: &str,
    progress: &DownloadProgress,
) -> Result<()> {
    let mut file = File::create(part).map_err(|e| RelbinError::FileWriteFailed {
        path: part.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = reader
            .read(&mut buffer)
            .map_err(|e| RelbinError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        if read == 0 {
            break;
        }

        file.write_all(&buffer[..read])
            .map_err(|e| RelbinError::FileWriteFailed {
                path: part.display().to_string(),
                reason: e.to_string(),
            })?;
        progress.advance(read as u64);
    }

    file.flush().map_err(|e| RelbinError::FileWriteFailed {
        path: part.display().to_string(),
        reason: e.to_string(),
    })
}
