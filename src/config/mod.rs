//! Configuration file handling for relbin
//!
//! This module contains data structures for:
//! - `relbin.lock` - Lock file recording installed packages
//! - `config.yaml` - Optional user settings

pub mod lockfile;
pub mod settings;

// Re-export commonly used types
pub use lockfile::{InstalledPackage, Lockfile, PackageSource};
pub use settings::Settings;
