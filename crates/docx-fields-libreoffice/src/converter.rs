//! Headless LibreOffice conversion: manages the soffice invocation and the
//! copy-back of its output.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use docx_fields_core::{
    copy_preserving_times, locate_program, Error, ExternalCommand, FieldUpdater, Result,
    TargetDocument,
};

/// Configuration for the LibreOffice strategy.
#[derive(Debug, Clone)]
pub struct LibreOfficeConfig {
    /// Path to the office executable. If None, searches for `candidates`.
    pub program: Option<PathBuf>,
    /// Executable names tried in order when `program` is not set.
    pub candidates: Vec<String>,
    /// Overrides `PATH` for the executable lookup.
    pub search_path: Option<OsString>,
    /// Target of `--convert-to`. Default: "docx".
    pub convert_to: String,
    /// Import filter passed as `--infilter`. Default: "MS Word 2010 XML".
    pub input_filter: String,
    /// Extra arguments placed before the input file.
    pub extra_args: Vec<String>,
}

impl Default for LibreOfficeConfig {
    fn default() -> Self {
        Self {
            program: None,
            candidates: vec!["libreoffice".to_string(), "soffice".to_string()],
            search_path: None,
            convert_to: "docx".to_string(),
            input_filter: "MS Word 2010 XML".to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// Updates fields by converting the document to its own format in a scratch
/// directory and copying the result back.
#[derive(Debug, Clone, Default)]
pub struct LibreOfficeUpdater {
    config: LibreOfficeConfig,
}

impl LibreOfficeUpdater {
    pub fn new(config: LibreOfficeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LibreOfficeConfig {
        &self.config
    }

    /// Resolve the office executable without running it.
    pub fn locate(&self) -> Result<PathBuf> {
        locate_program(
            self.config.program.as_deref(),
            &self.config.candidates,
            self.config.search_path.as_deref(),
        )
    }

    /// Build the conversion command for `input`, writing into `outdir`.
    pub fn conversion_command(&self, program: &Path, input: &Path, outdir: &Path) -> ExternalCommand {
        ExternalCommand::new(program)
            .args(["--headless", "--invisible", "--convert-to"])
            .arg(&self.config.convert_to)
            .arg(format!("--infilter={}", self.config.input_filter))
            .args(&self.config.extra_args)
            .arg(input)
            .arg("--outdir")
            .arg(outdir)
    }

    /// File name LibreOffice gives the converted copy of `input`.
    ///
    /// `--convert-to` accepts `ext` or `ext:FilterName`; only the extension
    /// part names the output.
    fn converted_name(&self, input: &Path) -> OsString {
        let ext = self
            .config
            .convert_to
            .split(':')
            .next()
            .unwrap_or(&self.config.convert_to);
        let mut name = input.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
        name.push(".");
        name.push(ext);
        name
    }
}

impl FieldUpdater for LibreOfficeUpdater {
    fn name(&self) -> &'static str {
        "linux-cli"
    }

    fn update(&self, document: &TargetDocument) -> Result<()> {
        let program = self.locate()?;

        let outdir = tempfile::Builder::new().prefix("docx-fields-").tempdir()?;
        let command = self.conversion_command(&program, document.path(), outdir.path());

        tracing::info!("Converting with LibreOffice: {}", document.path().display());
        if let Err(e) = command.run() {
            tracing::error!("LibreOffice conversion failed: {e}");
            return Err(e);
        }

        let converted = outdir.path().join(self.converted_name(document.path()));
        if !converted.is_file() {
            let e = Error::FieldUpdate(format!(
                "LibreOffice exited successfully but wrote no output at {} \
                 (is another LibreOffice instance holding the user profile?)",
                converted.display()
            ));
            tracing::error!("{e}");
            return Err(e);
        }

        copy_preserving_times(&converted, document.path())?;
        tracing::info!("Fields updated: {}", document.path().display());
        Ok(())
    }
}
