//! BLAKE3 hashing of downloaded assets

use std::fs::File;
use std::path::Path;

use blake3::Hasher;

use crate::error::{RelbinError, Result};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Calculate the BLAKE3 hash of a file, e.g. `blake3:af13...`
pub fn hash_file(path: &Path) -> Result<String> {
    let read_failed = |e: std::io::Error| RelbinError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let file = File::open(path).map_err(read_failed)?;
    let mut hasher = Hasher::new();
    hasher.update_reader(file).map_err(read_failed)?;

    Ok(format!("{HASH_PREFIX}{}", hasher.finalize().to_hex()))
}
