//! The Word automation sequence, independent of how Word is reached.
//!
//! [`refresh_with_word`] drives any [`WordConnector`]; on Windows the
//! connector is the COM layer in [`crate::com`], in tests it is an in-memory
//! fake.

use std::path::Path;

use docx_fields_core::{CleanupStack, Result};

/// Options passed to `Documents.Open` for documents that are not already open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOptions {
    pub confirm_conversions: bool,
    pub read_only: bool,
    pub add_to_recent_files: bool,
    pub password: String,
    pub open_and_repair: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            confirm_conversions: false,
            read_only: false,
            add_to_recent_files: false,
            password: String::new(),
            open_and_repair: false,
        }
    }
}

/// Obtains a Word application instance.
pub trait WordConnector {
    type App: WordApplication;

    /// The already-running instance, if there is one.
    fn attach_running(&self) -> Result<Option<Self::App>>;

    /// Start a new, invisible instance.
    fn launch(&self) -> Result<Self::App>;
}

/// A live `Word.Application`.
pub trait WordApplication: Clone {
    type Document: WordDocument;

    /// Every document currently open in this instance.
    fn open_documents(&self) -> Result<Vec<Self::Document>>;

    fn open_document(&self, path: &Path, options: &OpenOptions) -> Result<Self::Document>;

    /// Quit without saving anything still open.
    fn quit(&self) -> Result<()>;
}

/// A document inside a running Word instance.
pub trait WordDocument: Clone {
    /// Absolute path as Word reports it (`FullName`).
    fn full_name(&self) -> Result<String>;
    fn show_field_codes(&self, show: bool) -> Result<()>;
    fn repaginate(&self) -> Result<()>;
    fn update_fields(&self) -> Result<()>;
    fn update_tables_of_contents(&self) -> Result<()>;
    fn save(&self) -> Result<()>;
    /// Close without saving.
    fn close(&self) -> Result<()>;
}

/// Case-insensitive comparison of a Word `FullName` with a filesystem path.
///
/// Purely textual: `Z:\report.docx` and the UNC path it maps to are
/// different names here, so callers pass every spelling they know of.
pub fn same_document(full_name: &str, path: &Path) -> bool {
    fn normalize(s: &str) -> String {
        s.replace('/', "\\").to_lowercase()
    }
    normalize(full_name) == normalize(&path.to_string_lossy())
}

/// Find the document among those open in `app`, matching any of `names`
/// (canonical path, path as typed).
///
/// Documents whose name cannot be read (protected view, half-closed windows)
/// are skipped.
pub fn find_open_document<A: WordApplication>(
    app: &A,
    names: &[&Path],
) -> Result<Option<A::Document>> {
    for document in app.open_documents()? {
        match document.full_name() {
            Ok(name) if names.iter().any(|path| same_document(&name, path)) => {
                return Ok(Some(document));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Skipping open document with unreadable name: {e}"),
        }
    }
    Ok(None)
}

/// Refresh every field of `path` through Word.
///
/// `aliases` are other names of the same file (e.g. the mapped-drive path
/// the user typed); they are only used to recognise an already-open
/// document. Reuses a running Word and an already-open document when possible.
/// Whatever this call opened or launched is released again, newest first:
/// a freshly opened document is saved and closed, then a freshly launched
/// Word is quit. Release happens on error paths too.
pub fn refresh_with_word<C: WordConnector>(
    connector: &C,
    path: &Path,
    aliases: &[&Path],
    options: &OpenOptions,
) -> Result<()> {
    let mut cleanup = CleanupStack::new();

    let app = match connector.attach_running()? {
        Some(app) => {
            tracing::debug!("Attached to running Word instance");
            app
        }
        None => {
            tracing::debug!("No running Word instance, launching one");
            let app = connector.launch()?;
            let owned = app.clone();
            cleanup.push("quit Word", move || owned.quit());
            app
        }
    };

    let mut names = vec![path];
    names.extend_from_slice(aliases);

    let document = match find_open_document(&app, &names)? {
        Some(document) => {
            tracing::info!(
                "{} is already open in Word; updating in place without saving",
                path.display()
            );
            document
        }
        None => {
            let document = app.open_document(path, options)?;
            let owned = document.clone();
            cleanup.push("save and close document", move || {
                let saved = owned.save();
                owned.close()?;
                saved
            });
            document
        }
    };

    document.show_field_codes(false)?;
    document.repaginate()?;
    document.update_fields()?;
    document.update_tables_of_contents()?;

    cleanup.finish()
}
