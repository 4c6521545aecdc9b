//! relbin - install binaries from release assets
//!
//! Downloads release assets from GitHub or plain URLs, finds the executable
//! inside and installs it into a managed `bin` directory, tracking every
//! install in a lock file.

use clap::Parser;
use miette::Diagnostic;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod archive;
mod cli;
mod commands;
mod common;
mod config;
mod download;
mod error;
mod github;
mod hash;
mod installer;
mod paths;
mod progress;
mod prompt;
mod source;

use cli::{Cli, Commands};
use error::RelbinError;
use paths::StatePaths;

/// Environment variable holding the log filter
const LOG_ENV: &str = "RELBIN_LOG";

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Remove the staging and incoming directories after a failed command
///
/// Skipped when another process holds the state lock, since both are then in
/// use.
fn cleanup_staging(home: Option<PathBuf>, error: &RelbinError) {
    if matches!(error, RelbinError::StateLocked { .. }) {
        return;
    }

    let root = match home {
        Some(root) => root,
        None => match StatePaths::default_root() {
            Ok(root) => root,
            Err(_) => return,
        },
    };

    let paths = StatePaths::from_root(root);
    for dir in [&paths.tmp, &paths.incoming] {
        if let Err(e) = common::fs::remove_path(dir) {
            tracing::warn!("Failed to remove {}: {}", dir.display(), e);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let home = cli.home.clone();
    let result = match cli.command {
        Commands::Init => commands::init::run(cli.home),
        Commands::Install(args) => commands::install::run(cli.home, args),
        Commands::Upgrade(args) => commands::upgrade::run(cli.home, args),
        Commands::Uninstall(args) => commands::uninstall::run(cli.home, args),
        Commands::List(args) => commands::list::run(cli.home, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if let Some(help) = e.help() {
            eprintln!("  help: {}", help);
        }
        cleanup_staging(home, &e);
        std::process::exit(1);
    }
}
