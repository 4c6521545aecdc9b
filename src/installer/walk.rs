//! Filesystem walker for extracted assets

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// List every regular file under `root`, recursively
///
/// Entries are sorted by file name within each directory so repeated walks of
/// an unchanged tree return the same sequence. Any error (including an
/// unreadable root) aborts the walk; partial results are discarded.
pub fn walk(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
