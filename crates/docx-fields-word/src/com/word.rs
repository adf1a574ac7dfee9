//! Word-specific COM automation layer built on top of the generic IDispatch wrapper.

use std::path::Path;

use docx_fields_core::{Error, Result};

use super::dispatch::{variant_bool, variant_get_string, variant_i32, variant_str, DispatchObject};
use crate::automation::{OpenOptions, WordApplication, WordConnector, WordDocument};

// WdSaveOptions.wdDoNotSaveChanges
const WD_DO_NOT_SAVE_CHANGES: i32 = 0;
// WdAlertLevel.wdAlertsNone
const WD_ALERTS_NONE: i32 = 0;

fn com_err(context: &str) -> impl Fn(String) -> Error + '_ {
    move |e| Error::FieldUpdate(format!("{context}: {e}"))
}

/// Reaches Word through the Running Object Table or `CoCreateInstance`.
pub struct ComConnector {
    prog_id: String,
}

impl ComConnector {
    pub fn new(prog_id: impl Into<String>) -> Self {
        Self {
            prog_id: prog_id.into(),
        }
    }
}

impl WordConnector for ComConnector {
    type App = ComWordApp;

    fn attach_running(&self) -> Result<Option<ComWordApp>> {
        let app = DispatchObject::get_active(&self.prog_id).map_err(com_err("attach to Word"))?;
        Ok(app.map(|app| ComWordApp { app }))
    }

    fn launch(&self) -> Result<ComWordApp> {
        let app =
            DispatchObject::create_from_progid(&self.prog_id).map_err(com_err("launch Word"))?;

        // Disable UI elements for automation
        app.set_property("Visible", variant_bool(false))
            .map_err(com_err("hide Word"))?;
        app.set_property("DisplayAlerts", variant_i32(WD_ALERTS_NONE))
            .map_err(com_err("disable Word alerts"))?;

        Ok(ComWordApp { app })
    }
}

/// A `Word.Application` COM object.
#[derive(Clone)]
pub struct ComWordApp {
    app: DispatchObject,
}

impl WordApplication for ComWordApp {
    type Document = ComWordDocument;

    fn open_documents(&self) -> Result<Vec<ComWordDocument>> {
        let documents = self
            .app
            .get_child("Documents")
            .map_err(com_err("list open documents"))?;
        let items = documents.items().map_err(com_err("list open documents"))?;
        Ok(items.into_iter().map(|doc| ComWordDocument { doc }).collect())
    }

    fn open_document(&self, path: &Path, options: &OpenOptions) -> Result<ComWordDocument> {
        let context = format!("open {}", path.display());
        let documents = self
            .app
            .get_child("Documents")
            .map_err(com_err(&context))?;
        let doc = documents
            .invoke_child_named(
                "Open",
                &[
                    ("FileName", variant_str(&path.to_string_lossy())),
                    ("ConfirmConversions", variant_bool(options.confirm_conversions)),
                    ("ReadOnly", variant_bool(options.read_only)),
                    ("AddToRecentFiles", variant_bool(options.add_to_recent_files)),
                    ("PasswordDocument", variant_str(&options.password)),
                    ("OpenAndRepair", variant_bool(options.open_and_repair)),
                ],
            )
            .map_err(com_err(&context))?;
        tracing::debug!("Opened {} in Word", path.display());
        Ok(ComWordDocument { doc })
    }

    fn quit(&self) -> Result<()> {
        self.app
            .invoke_method_named("Quit", &[("SaveChanges", variant_i32(WD_DO_NOT_SAVE_CHANGES))])
            .map_err(com_err("quit Word"))?;
        Ok(())
    }
}

/// A `Word.Document` COM object.
#[derive(Clone)]
pub struct ComWordDocument {
    doc: DispatchObject,
}

impl WordDocument for ComWordDocument {
    fn full_name(&self) -> Result<String> {
        let variant = self
            .doc
            .get_property("FullName")
            .map_err(com_err("read document name"))?;
        variant_get_string(&variant)
            .ok_or_else(|| Error::FieldUpdate("FullName is not a string".to_string()))
    }

    fn show_field_codes(&self, show: bool) -> Result<()> {
        let view = self
            .doc
            .get_child("ActiveWindow")
            .and_then(|window| window.get_child("View"))
            .map_err(com_err("reach document view"))?;
        view.set_property("ShowFieldCodes", variant_bool(show))
            .map_err(com_err("toggle field codes"))
    }

    fn repaginate(&self) -> Result<()> {
        self.doc
            .invoke_method("Repaginate")
            .map_err(com_err("repaginate"))?;
        Ok(())
    }

    fn update_fields(&self) -> Result<()> {
        self.doc
            .get_child("Fields")
            .and_then(|fields| fields.invoke_method("Update"))
            .map_err(com_err("update fields"))?;
        Ok(())
    }

    fn update_tables_of_contents(&self) -> Result<()> {
        let tocs = self
            .doc
            .get_child("TablesOfContents")
            .and_then(|tocs| tocs.items())
            .map_err(com_err("list tables of contents"))?;
        for toc in tocs {
            toc.invoke_method("Update")
                .map_err(com_err("update table of contents"))?;
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        self.doc.invoke_method("Save").map_err(com_err("save document"))?;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.doc
            .invoke_method_named("Close", &[("SaveChanges", variant_i32(WD_DO_NOT_SAVE_CHANGES))])
            .map_err(com_err("close document"))?;
        Ok(())
    }
}
