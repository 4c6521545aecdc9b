//! Init command implementation

use std::path::PathBuf;

use console::Style;

use crate::config::Lockfile;
use crate::error::Result;
use crate::paths::StatePaths;

/// Run init command
pub fn run(home: Option<PathBuf>) -> Result<()> {
    let paths = StatePaths::init(home)?;

    if !paths.lockfile.exists() {
        Lockfile::new().save(&paths.lockfile)?;
    }

    println!(
        "{} {}",
        Style::new().green().bold().apply_to("Initialized"),
        paths.root.display()
    );
    println!("Add {} to your PATH to use installed binaries.", paths.bin.display());

    Ok(())
}
