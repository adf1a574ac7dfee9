//! Microsoft Word strategies for docx-fields.
//!
//! Two ways of getting Word to recalculate a document's fields:
//!
//! - [`WordComUpdater`]: late-bound COM automation of `Word.Application`.
//!   Reuses a running Word and an already-open document when it finds them,
//!   and releases whatever it opened itself.
//! - [`WordCliUpdater`]: starts `winword` on the document with the
//!   `FilePrintDefault` startup macro.
//!
//! # Architecture
//!
//! ```text
//! FieldRefresher (docx-fields)
//!     └── WordComUpdater (this crate)
//!           └── refresh_with_word(ComConnector)
//!                 └── COM: Word.Application -> Documents -> Document
//! ```
//!
//! The automation sequence lives in [`automation`] and is written against
//! the [`WordConnector`] / [`WordApplication`] / [`WordDocument`] traits, so
//! it runs unchanged against COM on Windows and against fakes in tests.

pub mod automation;
mod cli_updater;
#[cfg(windows)]
pub mod com;
mod com_updater;

pub use automation::{
    find_open_document, refresh_with_word, same_document, OpenOptions, WordApplication,
    WordConnector, WordDocument,
};
pub use cli_updater::{WordCliConfig, WordCliUpdater};
pub use com_updater::{WordComConfig, WordComUpdater};
