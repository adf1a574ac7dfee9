//! Tests for the Word automation sequence against an in-memory Word.
//!
//! The fake records every call in a shared event log so the tests can check
//! ordering, in particular that cleanup runs newest-first.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use docx_fields_core::{Error, Result};
use docx_fields_word::{
    refresh_with_word, OpenOptions, WordApplication, WordConnector, WordDocument,
};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct State {
    events: Vec<String>,
    running: bool,
    open: Vec<String>,
    fail_on: Option<&'static str>,
}

impl State {
    fn record(&mut self, event: impl Into<String>) -> Result<()> {
        let event = event.into();
        let failing = self.fail_on.is_some_and(|f| event.starts_with(f));
        self.events.push(event.clone());
        if failing {
            Err(Error::FieldUpdate(format!("{event} failed")))
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Default)]
struct FakeWord(Rc<RefCell<State>>);

#[derive(Clone)]
struct FakeDocument {
    word: FakeWord,
    name: String,
}

impl FakeWord {
    fn running_with(open: &[&str]) -> Self {
        let word = FakeWord::default();
        {
            let mut state = word.0.borrow_mut();
            state.running = true;
            state.open = open.iter().map(|s| s.to_string()).collect();
        }
        word
    }

    fn failing_on(self, event: &'static str) -> Self {
        self.0.borrow_mut().fail_on = Some(event);
        self
    }

    fn events(&self) -> Vec<String> {
        self.0.borrow().events.clone()
    }

    fn record(&self, event: impl Into<String>) -> Result<()> {
        self.0.borrow_mut().record(event)
    }
}

impl WordConnector for FakeWord {
    type App = FakeWord;

    fn attach_running(&self) -> Result<Option<FakeWord>> {
        if self.0.borrow().running {
            self.record("attach")?;
            Ok(Some(self.clone()))
        } else {
            Ok(None)
        }
    }

    fn launch(&self) -> Result<FakeWord> {
        self.record("launch")?;
        self.0.borrow_mut().running = true;
        Ok(self.clone())
    }
}

impl WordApplication for FakeWord {
    type Document = FakeDocument;

    fn open_documents(&self) -> Result<Vec<FakeDocument>> {
        Ok(self
            .0
            .borrow()
            .open
            .iter()
            .map(|name| FakeDocument {
                word: self.clone(),
                name: name.clone(),
            })
            .collect())
    }

    fn open_document(&self, path: &Path, options: &OpenOptions) -> Result<FakeDocument> {
        assert!(!options.read_only);
        assert!(!options.add_to_recent_files);
        let name = path.to_string_lossy().into_owned();
        self.record(format!("open {name}"))?;
        self.0.borrow_mut().open.push(name.clone());
        Ok(FakeDocument {
            word: self.clone(),
            name,
        })
    }

    fn quit(&self) -> Result<()> {
        self.record("quit")
    }
}

impl WordDocument for FakeDocument {
    fn full_name(&self) -> Result<String> {
        Ok(self.name.clone())
    }

    fn show_field_codes(&self, show: bool) -> Result<()> {
        self.word.record(format!("show_field_codes {show}"))
    }

    fn repaginate(&self) -> Result<()> {
        self.word.record("repaginate")
    }

    fn update_fields(&self) -> Result<()> {
        self.word.record("update_fields")
    }

    fn update_tables_of_contents(&self) -> Result<()> {
        self.word.record("update_tocs")
    }

    fn save(&self) -> Result<()> {
        self.word.record("save")
    }

    fn close(&self) -> Result<()> {
        self.word.record("close")
    }
}

const DOC: &str = r"C:\Docs\report.docx";

#[test]
fn test_launches_word_and_releases_in_reverse_order() {
    let word = FakeWord::default();

    refresh_with_word(&word, Path::new(DOC), &[], &OpenOptions::default()).unwrap();

    assert_eq!(
        word.events(),
        vec![
            "launch".to_string(),
            format!("open {DOC}"),
            "show_field_codes false".to_string(),
            "repaginate".to_string(),
            "update_fields".to_string(),
            "update_tocs".to_string(),
            "save".to_string(),
            "close".to_string(),
            "quit".to_string(),
        ]
    );
}

#[test]
fn test_reuses_already_open_document() {
    let word = FakeWord::running_with(&[r"C:\Other\notes.docx", r"c:\docs\REPORT.docx"]);

    refresh_with_word(&word, Path::new(DOC), &[], &OpenOptions::default()).unwrap();

    assert_eq!(
        word.events(),
        vec![
            "attach",
            "show_field_codes false",
            "repaginate",
            "update_fields",
            "update_tocs",
        ]
    );
}

#[test]
fn test_running_word_without_document_keeps_word_open() {
    let word = FakeWord::running_with(&[r"C:\Other\notes.docx"]);

    refresh_with_word(&word, Path::new(DOC), &[], &OpenOptions::default()).unwrap();

    let events = word.events();
    assert_eq!(events.first().map(String::as_str), Some("attach"));
    assert_eq!(events[1], format!("open {DOC}"));
    assert_eq!(&events[events.len() - 2..], &["save", "close"]);
    assert!(!events.iter().any(|e| e == "quit" || e == "launch"));
}

#[test]
fn test_failure_still_releases_everything() {
    let word = FakeWord::default().failing_on("update_fields");

    let err = refresh_with_word(&word, Path::new(DOC), &[], &OpenOptions::default()).unwrap_err();

    assert!(matches!(err, Error::FieldUpdate(_)));
    let events = word.events();
    assert_eq!(
        &events[events.len() - 4..],
        &["update_fields", "save", "close", "quit"]
    );
    assert!(!events.iter().any(|e| e == "update_tocs"));
}

#[test]
fn test_open_failure_quits_launched_word() {
    let word = FakeWord::default().failing_on("open");

    let err = refresh_with_word(&word, Path::new(DOC), &[], &OpenOptions::default()).unwrap_err();

    assert!(matches!(err, Error::FieldUpdate(_)));
    assert_eq!(word.events(), vec!["launch".to_string(), format!("open {DOC}"), "quit".to_string()]);
}

#[test]
fn test_close_runs_even_if_save_fails() {
    let word = FakeWord::default().failing_on("save");

    let err = refresh_with_word(&word, Path::new(DOC), &[], &OpenOptions::default()).unwrap_err();

    assert!(matches!(err, Error::FieldUpdate(_)));
    let events = word.events();
    assert_eq!(&events[events.len() - 3..], &["save", "close", "quit"]);
}

#[test]
fn test_launch_failure_is_reported() {
    let word = FakeWord::default().failing_on("launch");

    let err = refresh_with_word(&word, Path::new(DOC), &[], &OpenOptions::default()).unwrap_err();

    assert!(matches!(err, Error::FieldUpdate(_)));
    assert_eq!(word.events(), vec!["launch"]);
}

#[test]
fn test_recognises_document_opened_through_mapped_drive() {
    // Word knows the file by the drive letter; canonicalisation gave UNC.
    let word = FakeWord::running_with(&[r"Z:\Reports\report.docx"]);

    refresh_with_word(
        &word,
        Path::new(r"\\fileserver\share\Reports\report.docx"),
        &[Path::new(r"Z:\Reports\report.docx")],
        &OpenOptions::default(),
    )
    .unwrap();

    let events = word.events();
    assert!(!events.iter().any(|e| e.starts_with("open")), "{events:?}");
    assert!(!events.iter().any(|e| e == "save" || e == "close"));
}
