//! Command implementations for relbin CLI

pub mod completions;
pub mod helpers;
pub mod init;
pub mod install;
pub mod list;
pub mod uninstall;
pub mod upgrade;
pub mod version;
