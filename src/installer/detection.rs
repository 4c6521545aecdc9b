//! Binary detection
//!
//! Picks the one file in an extracted release that should be installed.
//! Detection runs an ordered list of [`Rule`]s over the walked files; the
//! first rule that matches anywhere in the list wins:
//!
//! 1. [`Rule::ExactName`]: an executable named exactly like the package
//! 2. [`Rule::WindowsExe`]: a file with an `.exe` extension
//! 3. [`Rule::SoleExecutable`]: the only executable file
//!
//! When no rule matches the user picks from the full file list.

use std::path::{Path, PathBuf};

use crate::common::fs as fs_utils;
use crate::error::{RelbinError, Result};
use crate::prompt::Prompter;

/// Prompt shown when detection needs a human
pub const SELECT_BINARY_MESSAGE: &str =
    "Could not automatically detect the binary. Please select it manually:";

/// Detection rules in priority order
pub const RULES: [Rule; 3] = [Rule::ExactName, Rule::WindowsExe, Rule::SoleExecutable];

/// How a binary was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Executable whose name equals the expected package name
    ExactName,
    /// Windows executable, recognised by extension
    WindowsExe,
    /// Exactly one executable in the tree
    SoleExecutable,
    /// Picked interactively
    UserChoice,
}

/// A walked file with the facts detection needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub name: String,
    pub extension: Option<String>,
    pub executable: bool,
}

impl CandidateFile {
    /// Inspect a file on disk
    pub fn probe(path: &Path) -> Result<Self> {
        let executable =
            fs_utils::is_executable(path).map_err(|e| RelbinError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            name: base_name(path),
            extension: path
                .extension()
                .map(|ext| ext.to_string_lossy().to_ascii_lowercase()),
            executable,
        })
    }

    fn is_windows_exe(&self) -> bool {
        self.extension.as_deref() == Some("exe")
    }
}

/// The file chosen for installation and the name to install it under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedBinary {
    pub path: PathBuf,
    pub name: String,
    pub rule: Rule,
}

impl Rule {
    /// Apply this rule to the whole candidate list
    pub fn apply(self, candidates: &[CandidateFile], expected_name: &str) -> Option<LocatedBinary> {
        let found = |candidate: &CandidateFile, name: &str| LocatedBinary {
            path: candidate.path.clone(),
            name: name.to_string(),
            rule: self,
        };

        match self {
            Rule::ExactName => candidates
                .iter()
                .find(|c| c.executable && c.name == expected_name)
                .map(|c| found(c, expected_name)),
            Rule::WindowsExe => candidates
                .iter()
                .find(|c| c.is_windows_exe())
                .map(|c| found(c, &c.name)),
            Rule::SoleExecutable => {
                let mut executables = candidates.iter().filter(|c| c.executable);
                match (executables.next(), executables.next()) {
                    (Some(only), None) => Some(found(only, &only.name)),
                    _ => None,
                }
            }
            Rule::UserChoice => None,
        }
    }
}

/// Pick the binary to install from `files`
///
/// Falls back to asking `prompter` when no rule matches; a cancelled prompt
/// propagates as the prompter's error.
pub fn locate(
    files: &[PathBuf],
    expected_name: &str,
    prompter: &dyn Prompter,
) -> Result<LocatedBinary> {
    let candidates = files
        .iter()
        .map(|path| CandidateFile::probe(path))
        .collect::<Result<Vec<_>>>()?;

    if let Some(found) = RULES
        .iter()
        .find_map(|rule| rule.apply(&candidates, expected_name))
    {
        return Ok(found);
    }

    let options: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
    let chosen = prompter.select(SELECT_BINARY_MESSAGE, &options)?;
    let path = PathBuf::from(chosen);

    Ok(LocatedBinary {
        name: base_name(&path),
        path,
        rule: Rule::UserChoice,
    })
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
