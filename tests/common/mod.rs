//! Common test utilities for relbin integration tests

#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch state directory plus a place to put "remote" files
pub struct TestHome {
    pub temp: TempDir,
    /// State root passed as RELBIN_HOME
    pub root: PathBuf,
    /// Files served through file:// URLs
    pub remote: PathBuf,
}

impl TestHome {
    /// A home whose state root does not exist yet
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().join("state");
        let remote = temp.path().join("remote");
        std::fs::create_dir_all(&remote).expect("Failed to create remote directory");
        Self { temp, root, remote }
    }

    /// A home with `relbin init` already run
    pub fn initialized() -> Self {
        let home = Self::new();
        home.cmd().arg("init").assert().success();
        home
    }

    /// relbin command pointed at this home
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_relbin"));
        cmd.env("RELBIN_HOME", &self.root)
            .env_remove("RELBIN_LOG")
            .env_remove("GITHUB_TOKEN");
        cmd
    }

    /// Write a tar.gz "release" with the given (path, mode) entries
    pub fn tarball(&self, name: &str, entries: &[(&str, u32)]) -> String {
        let path = self.remote.join(name);
        let file = File::create(&path).expect("Failed to create tarball");
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (entry, mode) in entries {
            let data = format!("#!/bin/sh\necho {entry}\n");
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(*mode);
            header.set_cksum();
            builder
                .append_data(&mut header, entry, data.as_bytes())
                .expect("Failed to append tar entry");
        }
        builder
            .into_inner()
            .expect("Failed to finish tar")
            .finish()
            .expect("Failed to finish gzip");
        file_url(&path)
    }

    /// Write a plain file and return its file:// URL
    pub fn raw(&self, name: &str, content: &str) -> String {
        let path = self.remote.join(name);
        std::fs::write(&path, content).expect("Failed to write remote file");
        file_url(&path)
    }

    pub fn bin(&self, name: &str) -> PathBuf {
        self.root.join("bin").join(name)
    }

    pub fn pkg(&self, name: &str) -> PathBuf {
        self.root.join("pkg").join(name)
    }

    pub fn tmp(&self) -> PathBuf {
        self.root.join("tmp")
    }

    pub fn lockfile(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.root.join("relbin.lock"))
            .expect("Failed to read lock file");
        serde_json::from_str(&content).expect("Lock file is not valid JSON")
    }

    /// Installed binary names in lock file order
    pub fn installed(&self) -> Vec<String> {
        self.lockfile()["packages"]
            .as_array()
            .map(|packages| {
                packages
                    .iter()
                    .filter_map(|p| p["binary"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}

pub fn file_url(path: &Path) -> String {
    url::Url::from_file_path(path)
        .expect("Absolute path")
        .to_string()
}
