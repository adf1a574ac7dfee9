//! # docx-fields
//!
//! Refresh computed fields (page numbers, tables of contents,
//! cross-references) in `.docx` documents by driving an office application:
//!
//! - Windows: Microsoft Word through COM automation, or `winword` on the
//!   command line
//! - Linux: headless LibreOffice conversion
//!
//! Every run validates the path, writes a `<name>_backup.docx` copy next to
//! the document and then hands the document to the selected strategy, which
//! rewrites it in place.
//!
//! ## Example
//!
//! ```rust,no_run
//! use docx_fields::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let refresher = FieldRefresher::new(RefreshConfig {
//!         backup: BackupPolicy::Numbered,
//!         ..Default::default()
//!     });
//!     let outcome = refresher.refresh("report.docx")?;
//!     println!("backup at {}", outcome.backup.display());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod prelude;
pub mod refresher;
pub mod strategy;

pub use config::{RefreshConfig, StrategyKind};
pub use refresher::{update_fields, FieldRefresher, RefreshOutcome};
pub use strategy::Strategy;

// Re-export core types
pub use docx_fields_core::{
    backup_path_for, BackupPolicy, Error, FieldUpdater, InvalidReason, Platform, Result,
    TargetDocument, BACKUP_SUFFIX, DEFAULT_EXTENSION,
};

// Re-export strategy configuration
pub use docx_fields_libreoffice::{LibreOfficeConfig, LibreOfficeUpdater};
pub use docx_fields_word::{OpenOptions, WordCliConfig, WordCliUpdater, WordComConfig, WordComUpdater};
