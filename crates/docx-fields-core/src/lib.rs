//! Core building blocks for refreshing fields in word-processing documents.
//!
//! This crate holds everything that does not depend on a particular office
//! application:
//!
//! - [`TargetDocument`]: path validation (existence, extension)
//! - [`make_backup`]: the copy taken before a document is mutated
//! - [`Platform`]: host operating system detection
//! - [`CleanupStack`]: LIFO release of automation resources
//! - [`locate_program`] / [`ExternalCommand`]: finding and running office executables
//! - [`FieldUpdater`]: the interface every office-application strategy implements

pub mod backup;
pub mod cleanup;
pub mod document;
pub mod error;
pub mod platform;
pub mod program;

pub use backup::{backup_path_for, copy_preserving_times, make_backup, BackupPolicy, BACKUP_SUFFIX};
pub use cleanup::CleanupStack;
pub use document::{TargetDocument, DEFAULT_EXTENSION};
pub use error::{Error, InvalidReason, Result};
pub use platform::Platform;
pub use program::{locate_program, ExternalCommand};

/// A way of making an office application recalculate every field of a
/// document in place.
///
/// Implementations receive a document that has already been validated and
/// backed up.
pub trait FieldUpdater {
    /// Short identifier used in logs (e.g. `linux-cli`).
    fn name(&self) -> &'static str;

    /// Recalculate all fields of `document`, writing the result over the
    /// original file.
    fn update(&self, document: &TargetDocument) -> Result<()>;
}

impl<T: FieldUpdater + ?Sized> FieldUpdater for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn update(&self, document: &TargetDocument) -> Result<()> {
        (**self).update(document)
    }
}

/// Updater for platforms without an implementation; always fails with
/// [`Error::UnsupportedPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedUpdater {
    pub platform: Platform,
}

impl FieldUpdater for UnsupportedUpdater {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn update(&self, _document: &TargetDocument) -> Result<()> {
        Err(Error::UnsupportedPlatform(self.platform.clone()))
    }
}
