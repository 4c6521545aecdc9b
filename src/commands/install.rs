//! Install command implementation
//!
//! For every reference given on the command line:
//! 1. Parse the reference
//! 2. Resolve it to a release asset (GitHub) or take the URL as-is
//! 3. Skip it if the same release is already installed
//! 4. Download the asset into `pkg/`
//! 5. Run the installation engine
//! 6. Record the new package and save the lock file
//!
//! A declined overwrite skips that reference; the rest still install.

use std::path::PathBuf;

use console::Style;
use tracing::{debug, warn};

use crate::cli::InstallArgs;
use crate::commands::helpers::{Context, Session};
use crate::config::{InstalledPackage, Lockfile};
use crate::error::Result;
use crate::github::assets::{self, Platform};
use crate::installer::InstallMode;
use crate::prompt::InquirePrompter;
use crate::source::PackageReference;

/// What happened to one reference
#[derive(Debug)]
pub enum InstallOutcome {
    Installed {
        lockfile: Lockfile,
        package: InstalledPackage,
    },
    AlreadyInstalled(InstalledPackage),
}

/// A release asset ready to download
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedAsset {
    tag: String,
    name: String,
    url: String,
}

/// Run install command
pub fn run(home: Option<PathBuf>, args: InstallArgs) -> Result<()> {
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

    for input in &args.references {
        match install_reference(&ctx, input, &lockfile) {
            Ok(InstallOutcome::Installed {
                lockfile: updated,
                package,
            }) => {
                session.save_lockfile(&updated)?;
                lockfile = updated;
                println!(
                    "{} {} from {}",
                    Style::new().green().bold().apply_to("Installed"),
                    Style::new().bold().apply_to(&package.binary),
                    package.origin()
                );
            }
            Ok(InstallOutcome::AlreadyInstalled(package)) => {
                println!(
                    "{} is already installed as {}",
                    package.origin(),
                    Style::new().bold().apply_to(&package.binary)
                );
            }
            Err(e) if e.is_abort() => {
                warn!("Skipping {}: {}", input, e);
                println!("{} {}: {}", Style::new().yellow().apply_to("Skipped"), input, e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

/// Install one reference on top of `lockfile`
///
/// `lockfile` itself is never modified; the updated copy comes back in
/// [`InstallOutcome::Installed`].
pub fn install_reference(
    ctx: &Context<'_>,
    input: &str,
    lockfile: &Lockfile,
) -> Result<InstallOutcome> {
    let reference = PackageReference::parse(input)?;
    debug!("Parsed {} as {:?}", input, reference);

    let asset = resolve_asset(ctx, &reference)?;
    let candidate =
        InstalledPackage::from_reference(&reference, &asset.tag, &asset.name, &asset.url, "");

    if let Some(existing) = lockfile.find_same_release(&candidate) {
        return Ok(InstallOutcome::AlreadyInstalled(existing.clone()));
    }

    let download = ctx.fetch_asset(&asset.url, &asset.name)?;
    let installed = ctx.installer().install(
        &download,
        &reference.expected_binary_name(),
        lockfile.clone(),
        InstallMode::Fresh,
    )?;

    let package = InstalledPackage {
        binary: installed.binary,
        ..candidate
    }
    .with_hash(download.hash);

    let mut lockfile = installed.lockfile;
    lockfile.add_package(package.clone());
    Ok(InstallOutcome::Installed { lockfile, package })
}

fn resolve_asset(ctx: &Context<'_>, reference: &PackageReference) -> Result<ResolvedAsset> {
    match reference {
        PackageReference::GitHub(github) => {
            let release = ctx.fetch_release(&github.owner, &github.repo, github.tag.as_deref())?;
            let asset = assets::select_asset(
                &release,
                github.asset.as_deref(),
                &ctx.platform,
                ctx.prompter,
            )?;
            debug!("Selected asset {} ({} bytes)", asset.name, asset.size);

            Ok(ResolvedAsset {
                tag: release.tag_name,
                name: asset.name,
                url: asset.browser_download_url,
            })
        }
        PackageReference::Url { url, asset } => Ok(ResolvedAsset {
            tag: String::new(),
            name: asset.clone(),
            url: url.clone(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::helpers::testing::{FakeDownloader, FakeReleases};
    use crate::config::PackageSource;
    use crate::error::RelbinError;
    use crate::github::{Release, ReleaseAsset};
    use crate::paths::StatePaths;
    use crate::prompt::testing::{Answer, ScriptedPrompter};
    use std::fs::{self, File};
    use std::path::Path;
    use tempfile::TempDir;

    const LINUX_X64: Platform = Platform {
        os: "linux",
        arch: "x86_64",
    };

    fn tarball(path: &Path, entries: &[(&str, u32)]) {
        let file = File::create(path).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, mode) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(4);
            header.set_mode(*mode);
            header.set_cksum();
            builder.append_data(&mut header, name, &b"\x7fELF"[..]).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    struct Fixture {
        _temp: TempDir,
        files: PathBuf,
        paths: StatePaths,
        releases: FakeReleases,
        downloader: FakeDownloader,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let files = temp.path().join("files");
            fs::create_dir_all(&files).unwrap();
            let paths = StatePaths::init(Some(temp.path().join("state"))).unwrap();
            Self {
                _temp: temp,
                files,
                paths,
                releases: FakeReleases::default(),
                downloader: FakeDownloader::default(),
            }
        }

        /// Publish a release of `owner/repo` with one tarball per (asset, entries)
        fn publish(&mut self, repo: &str, tag: &str, assets: &[(&str, &[(&str, u32)])]) {
            let mut release = Release {
                tag_name: tag.to_string(),
                assets: Vec::new(),
            };
            for (name, entries) in assets {
                let url = format!("https://github.com/{repo}/releases/download/{tag}/{name}");
                let local = self.files.join(format!("{tag}-{name}"));
                tarball(&local, entries);
                self.downloader.files.insert(url.clone(), local);
                release.assets.push(ReleaseAsset {
                    name: name.to_string(),
                    browser_download_url: url,
                    size: 0,
                });
            }
            self.releases.releases.insert(repo.to_string(), release);
        }

        fn context<'a>(&'a self, prompter: &'a ScriptedPrompter) -> Context<'a> {
            Context {
                paths: &self.paths,
                releases: &self.releases,
                downloader: &self.downloader,
                prompter,
                platform: LINUX_X64,
            }
        }
    }

    #[test]
    fn test_install_github_latest() {
        let mut fx = Fixture::new();
        fx.publish(
            "sharkdp/fd",
            "v10.2.0",
            &[
                ("fd-v10.2.0-x86_64-unknown-linux-musl.tar.gz", &[("fd-v10.2.0/fd", 0o755)]),
                ("fd-v10.2.0-x86_64-apple-darwin.tar.gz", &[("fd-v10.2.0/fd", 0o755)]),
            ],
        );
        let prompter = ScriptedPrompter::silent();

        let outcome = install_reference(&fx.context(&prompter), "sharkdp/fd", &Lockfile::new())
            .unwrap();

        let InstallOutcome::Installed { lockfile, package } = outcome else {
            panic!("Expected Installed");
        };
        assert_eq!(package.binary, "fd");
        assert_eq!(package.source, PackageSource::GitHub);
        assert_eq!(package.tag, "v10.2.0");
        assert_eq!(package.asset, "fd-v10.2.0-x86_64-unknown-linux-musl.tar.gz");
        assert!(package.hash.as_deref().unwrap().starts_with("blake3:"));
        assert_eq!(lockfile.packages, [package]);
        assert!(fx.paths.binary_path("fd").is_file());
        assert!(fx.paths.asset_path("fd-v10.2.0-x86_64-unknown-linux-musl.tar.gz").is_file());
    }

    #[test]
    fn test_install_same_release_is_skipped() {
        let mut fx = Fixture::new();
        fx.publish("o/tool", "v1", &[("tool-linux-amd64.tar.gz", &[("tool", 0o755)])]);
        let prompter = ScriptedPrompter::silent();
        let ctx = fx.context(&prompter);

        let InstallOutcome::Installed { lockfile, .. } =
            install_reference(&ctx, "o/tool", &Lockfile::new()).unwrap()
        else {
            panic!("Expected Installed");
        };

        let again = install_reference(&ctx, "o/tool@v1", &lockfile).unwrap();
        assert!(matches!(again, InstallOutcome::AlreadyInstalled(p) if p.binary == "tool"));
        assert_eq!(fx.downloader.requested.borrow().len(), 1);
    }

    #[test]
    fn test_declined_overwrite_leaves_lockfile_alone() {
        let mut fx = Fixture::new();
        fx.publish("a/tool", "v1", &[("tool-linux-amd64.tar.gz", &[("tool", 0o755)])]);
        fx.publish("b/tool", "v9", &[("tool-linux-x64.tar.gz", &[("tool", 0o755)])]);

        let first = ScriptedPrompter::silent();
        let InstallOutcome::Installed { lockfile, .. } =
            install_reference(&fx.context(&first), "a/tool", &Lockfile::new()).unwrap()
        else {
            panic!("Expected Installed");
        };
        let before = lockfile.clone();

        let decline = ScriptedPrompter::new([Answer::Confirm(false)]);
        let result = install_reference(&fx.context(&decline), "b/tool", &lockfile);

        assert!(result.unwrap_err().is_abort());
        assert_eq!(lockfile, before);
        assert!(!fx.paths.asset_path("tool-linux-x64.tar.gz").exists());
        assert!(fx.paths.asset_path("tool-linux-amd64.tar.gz").exists());
    }

    #[test]
    fn test_declined_overwrite_with_shared_asset_name_keeps_installed_asset() {
        let mut fx = Fixture::new();
        fx.publish("a/tool", "v1", &[("tool-linux-amd64.tar.gz", &[("tool", 0o755)])]);
        fx.publish("b/tool", "v9", &[("tool-linux-amd64.tar.gz", &[("bin/tool", 0o755)])]);

        let first = ScriptedPrompter::silent();
        let InstallOutcome::Installed { lockfile, .. } =
            install_reference(&fx.context(&first), "a/tool", &Lockfile::new()).unwrap()
        else {
            panic!("Expected Installed");
        };
        let installed_asset = fx.paths.asset_path("tool-linux-amd64.tar.gz");
        let original = fs::read(&installed_asset).unwrap();

        let decline = ScriptedPrompter::new([Answer::Confirm(false)]);
        let result = install_reference(&fx.context(&decline), "b/tool", &lockfile);

        assert!(result.unwrap_err().is_abort());
        assert_eq!(lockfile.packages[0].asset, "tool-linux-amd64.tar.gz");
        assert_eq!(fs::read(&installed_asset).unwrap(), original);
        assert!(!fx.paths.incoming_path("tool-linux-amd64.tar.gz").exists());
    }

    #[test]
    fn test_confirmed_overwrite_replaces_entry() {
        let mut fx = Fixture::new();
        fx.publish("a/tool", "v1", &[("tool-linux-amd64.tar.gz", &[("tool", 0o755)])]);
        fx.publish("b/tool", "v9", &[("tool-linux-x64.tar.gz", &[("tool", 0o755)])]);

        let first = ScriptedPrompter::silent();
        let InstallOutcome::Installed { lockfile, .. } =
            install_reference(&fx.context(&first), "a/tool", &Lockfile::new()).unwrap()
        else {
            panic!("Expected Installed");
        };

        let accept = ScriptedPrompter::new([Answer::Confirm(true)]);
        let InstallOutcome::Installed { lockfile, .. } =
            install_reference(&fx.context(&accept), "b/tool", &lockfile).unwrap()
        else {
            panic!("Expected Installed");
        };

        assert_eq!(lockfile.packages.len(), 1);
        assert_eq!(lockfile.packages[0].owner, "b");
        assert!(!fx.paths.asset_path("tool-linux-amd64.tar.gz").exists());
    }

    #[test]
    fn test_install_from_url() {
        let fx = Fixture::new();
        let local = fx.files.join("jq-linux-amd64");
        fs::write(&local, "binary").unwrap();

        let url = url::Url::from_file_path(&local).unwrap().to_string();
        let mut downloader = FakeDownloader::default();
        downloader.files.insert(url.clone(), local);
        let prompter = ScriptedPrompter::silent();
        let ctx = Context {
            downloader: &downloader,
            ..fx.context(&prompter)
        };

        let InstallOutcome::Installed { package, .. } =
            install_reference(&ctx, &url, &Lockfile::new()).unwrap()
        else {
            panic!("Expected Installed");
        };
        assert_eq!(package.source, PackageSource::Url);
        assert_eq!(package.binary, "jq-linux-amd64");
        assert_eq!(package.url, url);
        assert!(package.tag.is_empty());
    }

    #[test]
    fn test_missing_release_propagates() {
        let fx = Fixture::new();
        let prompter = ScriptedPrompter::silent();
        let result = install_reference(&fx.context(&prompter), "o/missing", &Lockfile::new());
        assert!(matches!(result, Err(RelbinError::ReleaseNotFound { .. })));
    }

    #[test]
    fn test_invalid_reference() {
        let fx = Fixture::new();
        let prompter = ScriptedPrompter::silent();
        let result = install_reference(&fx.context(&prompter), "not a valid ref !!", &Lockfile::new());
        assert!(matches!(result, Err(RelbinError::UnrecognizedInput { .. })));
    }
}
