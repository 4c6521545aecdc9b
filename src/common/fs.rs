//! Common file system operations with unified error handling

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{RelbinError, Result};

/// Mode given to every installed or staged binary
#[cfg(unix)]
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Copy `src` to `dst` and mark the destination executable
///
/// The source's own permission bits are ignored: the destination always ends
/// up `0o755` on unix.
pub fn copy_executable(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| RelbinError::FileWriteFailed {
            path: parent.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    fs::copy(src, dst).map_err(|e| RelbinError::FileWriteFailed {
        path: dst.display().to_string(),
        reason: format!("copy from {} failed: {e}", src.display()),
    })?;

    set_executable(dst)
}

/// Set owner/group/other execute permissions on a file
#[cfg(unix)]
pub fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE)).map_err(|e| {
        RelbinError::FileWriteFailed {
            path: path.display().to_string(),
            reason: format!("chmod failed: {e}"),
        }
    })
}

#[cfg(not(unix))]
pub fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Whether a file has any execute bit set
#[cfg(unix)]
pub fn is_executable(path: &Path) -> io::Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    Ok(fs::metadata(path)?.permissions().mode() & 0o111 != 0)
}

/// Execute bits do not exist here; `.exe` detection covers these platforms
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> io::Result<bool> {
    fs::metadata(path).map(|_| false)
}

/// Remove a file or directory tree, treating "already gone" as success
pub fn remove_path(path: &Path) -> Result<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(RelbinError::IoError {
            message: format!("Failed to remove {}: {e}", path.display()),
        }),
    }
}

/// Move `src` over `dst`, replacing any file already there
pub fn move_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| RelbinError::FileWriteFailed {
            path: parent.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    fs::rename(src, dst).map_err(|e| RelbinError::FileWriteFailed {
        path: dst.display().to_string(),
        reason: format!("move from {} failed: {e}", src.display()),
    })
}
