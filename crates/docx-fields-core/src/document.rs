//! Validation of the document that is about to be refreshed.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, InvalidReason, Result};

/// Extension of Word Open XML documents.
pub const DEFAULT_EXTENSION: &str = "docx";

/// A document path that has been resolved and checked.
///
/// The only way to obtain one is through [`TargetDocument::validate`] (or
/// [`TargetDocument::validate_with_extension`]), so anything holding a
/// `TargetDocument` may assume the file existed and carried the right
/// extension at validation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDocument {
    path: PathBuf,
    requested: PathBuf,
}

impl TargetDocument {
    /// Validate `candidate` as a `.docx` document.
    pub fn validate(candidate: impl AsRef<Path>) -> Result<Self> {
        Self::validate_with_extension(candidate, DEFAULT_EXTENSION)
    }

    /// Resolve `candidate` to an absolute canonical path and check that it is
    /// an existing regular file whose extension equals `extension`
    /// (ASCII case-insensitive, without the leading dot).
    pub fn validate_with_extension(candidate: impl AsRef<Path>, extension: &str) -> Result<Self> {
        let candidate = candidate.as_ref();
        let extension = extension.trim_start_matches('.');

        if candidate.as_os_str().is_empty() {
            return Err(Error::invalid_document(candidate, InvalidReason::NoPath));
        }

        let resolved = match std::fs::canonicalize(candidate) {
            Ok(p) => strip_verbatim_prefix(p),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::invalid_document(
                    candidate,
                    InvalidReason::DoesNotExist,
                ));
            }
            Err(e) => return Err(Error::Io(e)),
        };

        if !resolved.is_file() {
            return Err(Error::invalid_document(resolved, InvalidReason::NotAFile));
        }

        if !has_extension(&resolved, extension) {
            return Err(Error::invalid_document(
                resolved,
                InvalidReason::WrongExtension {
                    expected: extension.to_string(),
                },
            ));
        }

        let requested = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            std::env::current_dir()?.join(candidate)
        };

        Ok(Self {
            path: resolved,
            requested,
        })
    }

    /// Absolute path of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute form of the path as it was given, before symlinks and mapped
    /// drives were resolved. Applications that track open files by the name
    /// the user typed (Word's `FullName` on a mapped drive) report this one.
    pub fn requested_path(&self) -> &Path {
        &self.requested
    }

    /// File name component (e.g. `report.docx`).
    pub fn file_name(&self) -> &OsStr {
        // A canonical path to a regular file always has a final component.
        self.path.file_name().unwrap_or_default()
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for TargetDocument {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

fn has_extension(path: &Path, expected: &str) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(expected))
}

/// `canonicalize` on Windows yields `\\?\C:\...` paths, which Word refuses to
/// open. Turn them back into ordinary drive or UNC paths.
#[cfg(windows)]
fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    let stripped = {
        let s = path.to_string_lossy();
        if let Some(rest) = s.strip_prefix(r"\\?\UNC\") {
            Some(PathBuf::from(format!(r"\\{rest}")))
        } else {
            s.strip_prefix(r"\\?\").map(PathBuf::from)
        }
    };
    stripped.unwrap_or(path)
}

#[cfg(not(windows))]
fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    path
}
