//! Field updates through Word COM automation.

use docx_fields_core::{FieldUpdater, Result, TargetDocument};

use crate::automation::OpenOptions;

/// Configuration for the COM strategy.
#[derive(Debug, Clone)]
pub struct WordComConfig {
    /// ProgID of the automation server. Default: "Word.Application".
    pub prog_id: String,
    /// Options for documents that are not already open.
    pub open_options: OpenOptions,
}

impl Default for WordComConfig {
    fn default() -> Self {
        Self {
            prog_id: "Word.Application".to_string(),
            open_options: OpenOptions::default(),
        }
    }
}

/// Updates fields by automating `Word.Application` over COM.
#[derive(Debug, Clone, Default)]
pub struct WordComUpdater {
    config: WordComConfig,
}

impl WordComUpdater {
    pub fn new(config: WordComConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WordComConfig {
        &self.config
    }
}

impl FieldUpdater for WordComUpdater {
    fn name(&self) -> &'static str {
        "windows-com"
    }

    #[cfg(windows)]
    fn update(&self, document: &TargetDocument) -> Result<()> {
        use crate::automation::refresh_with_word;
        use crate::com::{ComApartment, ComConnector};
        use docx_fields_core::Error;

        let _apartment = ComApartment::init().map_err(Error::FieldUpdate)?;
        let connector = ComConnector::new(&self.config.prog_id);

        tracing::info!("Updating fields with Word: {}", document.path().display());
        match refresh_with_word(
            &connector,
            document.path(),
            &[document.requested_path()],
            &self.config.open_options,
        ) {
            Ok(()) => {
                tracing::info!("Fields updated: {}", document.path().display());
                Ok(())
            }
            Err(e) => {
                tracing::error!("Word automation failed: {e}");
                Err(e)
            }
        }
    }

    #[cfg(not(windows))]
    fn update(&self, _document: &TargetDocument) -> Result<()> {
        Err(docx_fields_core::Error::UnsupportedPlatform(
            docx_fields_core::Platform::current(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prog_id() {
        assert_eq!(WordComUpdater::default().config().prog_id, "Word.Application");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_com_is_unavailable_off_windows() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.docx");
        std::fs::write(&file, b"PK").unwrap();
        let doc = TargetDocument::validate(&file).unwrap();

        let err = WordComUpdater::default().update(&doc).unwrap_err();
        assert!(matches!(
            err,
            docx_fields_core::Error::UnsupportedPlatform(_)
        ));
    }
}
