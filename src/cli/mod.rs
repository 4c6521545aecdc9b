//! CLI definitions using clap derive API
//!
//! Each command's arguments live in their own submodule:
//! - install: Install command arguments
//! - upgrade: Upgrade command arguments
//! - uninstall: Uninstall command arguments
//! - list: List command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod install;
pub mod list;
pub mod uninstall;
pub mod upgrade;

pub use completions::CompletionsArgs;
pub use install::InstallArgs;
pub use list::ListArgs;
pub use uninstall::UninstallArgs;
pub use upgrade::UpgradeArgs;

/// relbin - install binaries from release assets
///
/// Download prebuilt binaries from GitHub releases or plain URLs into one
/// managed directory and keep track of them.
#[derive(Parser, Debug)]
#[command(
    name = "relbin",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install binaries straight from release assets",
    long_about = "relbin downloads release assets from GitHub or any URL, finds the executable \
                  inside, installs it into ~/.relbin/bin and records it in a lock file so it can \
                  be upgraded or removed later.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  relbin init                                \x1b[90m# Create ~/.relbin\x1b[0m\n   \
                  relbin install BurntSushi/ripgrep          \x1b[90m# Latest release from GitHub\x1b[0m\n   \
                  relbin install sharkdp/fd@v10.2.0          \x1b[90m# Specific tag\x1b[0m\n   \
                  relbin install https://example.com/tool.zip \x1b[90m# Any download URL\x1b[0m\n   \
                  relbin upgrade --all                       \x1b[90m# Upgrade everything\x1b[0m\n   \
                  relbin list --tags                         \x1b[90m# Show installed binaries\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// State directory (defaults to ~/.relbin)
    #[arg(long, global = true, env = "RELBIN_HOME")]
    pub home: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the state directory
    Init,

    /// Install binaries from GitHub releases or URLs
    Install(InstallArgs),

    /// Upgrade installed binaries to their latest release
    Upgrade(UpgradeArgs),

    /// Remove installed binaries
    Uninstall(UninstallArgs),

    /// List installed binaries
    List(ListArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
