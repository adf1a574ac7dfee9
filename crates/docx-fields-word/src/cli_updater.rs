//! Field updates by launching `winword` with a startup macro.
//!
//! Word recalculates fields while printing, so starting it with
//! `/mFilePrintDefault` on the document refreshes them as a side effect.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use docx_fields_core::{locate_program, ExternalCommand, FieldUpdater, Result, TargetDocument};

/// Configuration for the command-line Word strategy.
#[derive(Debug, Clone)]
pub struct WordCliConfig {
    /// Path to `winword.exe`. If None, searches for `candidates`.
    pub program: Option<PathBuf>,
    /// Executable names tried in order when `program` is not set.
    pub candidates: Vec<String>,
    /// Overrides `PATH` for the executable lookup.
    pub search_path: Option<OsString>,
    /// Macro run at startup via `/m`. Default: "FilePrintDefault".
    pub startup_macro: String,
}

impl Default for WordCliConfig {
    fn default() -> Self {
        Self {
            program: None,
            candidates: vec!["winword".to_string()],
            search_path: None,
            startup_macro: "FilePrintDefault".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WordCliUpdater {
    config: WordCliConfig,
}

impl WordCliUpdater {
    pub fn new(config: WordCliConfig) -> Self {
        Self { config }
    }

    pub fn locate(&self) -> Result<PathBuf> {
        locate_program(
            self.config.program.as_deref(),
            &self.config.candidates,
            self.config.search_path.as_deref(),
        )
    }

    /// `winword <document> /m<macro> /q`
    pub fn command(&self, program: &Path, document: &Path) -> ExternalCommand {
        ExternalCommand::new(program)
            .arg(document)
            .arg(format!("/m{}", self.config.startup_macro))
            .arg("/q")
    }
}

impl FieldUpdater for WordCliUpdater {
    fn name(&self) -> &'static str {
        "windows-cli"
    }

    fn update(&self, document: &TargetDocument) -> Result<()> {
        let program = self.locate()?;

        tracing::info!("Updating fields with winword: {}", document.path().display());
        if let Err(e) = self.command(&program, document.path()).run() {
            tracing::error!("winword failed: {e}");
            return Err(e);
        }
        tracing::info!("Fields updated: {}", document.path().display());
        Ok(())
    }
}
