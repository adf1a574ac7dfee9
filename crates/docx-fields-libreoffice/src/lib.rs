//! LibreOffice strategy for docx-fields.
//!
//! LibreOffice has no "update fields" command-line switch, but converting a
//! document to its own format re-serializes it, which recalculates page
//! numbers, tables of contents and cross-references on the way.
//!
//! # Architecture
//!
//! ```text
//! FieldRefresher (docx-fields)
//!     └── LibreOfficeUpdater (this crate)
//!           └── spawns: libreoffice --headless --convert-to docx ... --outdir <tmp>
//!                 └── <tmp>/report.docx copied back over report.docx
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use docx_fields_core::{FieldUpdater, TargetDocument};
//! use docx_fields_libreoffice::{LibreOfficeConfig, LibreOfficeUpdater};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let document = TargetDocument::validate("report.docx")?;
//!     LibreOfficeUpdater::new(LibreOfficeConfig::default()).update(&document)?;
//!     Ok(())
//! }
//! ```

pub mod converter;

pub use converter::{LibreOfficeConfig, LibreOfficeUpdater};
