//! Error types for docx-fields-core

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::platform::Platform;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while refreshing document fields
#[derive(Debug, Error)]
pub enum Error {
    /// The target path is missing or is not a document of the expected type
    #[error("Invalid document '{}': {reason}", path.display())]
    InvalidDocument {
        path: PathBuf,
        reason: InvalidReason,
    },

    /// A required external application could not be located
    #[error("Required program not found: {program}")]
    MissingDependency { program: String },

    /// The office application reported a failure
    #[error("Field update failed: {0}")]
    FieldUpdate(String),

    /// No updater exists for this operating system
    #[error("Field update is not supported on platform '{0}'")]
    UnsupportedPlatform(Platform),

    /// IO error (backup creation, copying results back)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a candidate path was rejected by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// Nothing exists at the path
    DoesNotExist,
    /// The path exists but is a directory or other non-file
    NotAFile,
    /// The file extension does not match
    WrongExtension { expected: String },
    /// No path was supplied at all
    NoPath,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::DoesNotExist => write!(f, "file does not exist"),
            InvalidReason::NotAFile => write!(f, "not a regular file"),
            InvalidReason::WrongExtension { expected } => {
                write!(f, "wrong extension (expected .{expected})")
            }
            InvalidReason::NoPath => write!(f, "no file was chosen"),
        }
    }
}

impl Error {
    /// Shorthand for building an [`Error::InvalidDocument`].
    pub fn invalid_document(path: impl Into<PathBuf>, reason: InvalidReason) -> Self {
        Error::InvalidDocument {
            path: path.into(),
            reason,
        }
    }

    /// Shorthand for building an [`Error::MissingDependency`].
    pub fn missing(program: impl Into<String>) -> Self {
        Error::MissingDependency {
            program: program.into(),
        }
    }

    /// The validator's reason, if this is an [`Error::InvalidDocument`].
    pub fn invalid_reason(&self) -> Option<&InvalidReason> {
        match self {
            Error::InvalidDocument { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
