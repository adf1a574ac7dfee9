//! Backup copies made before a document is handed to an office application.

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use crate::document::TargetDocument;
use crate::error::Result;

/// Suffix inserted between the file stem and the extension.
pub const BACKUP_SUFFIX: &str = "_backup";

/// What to do when a backup from an earlier run already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackupPolicy {
    /// Always write `<stem>_backup.<ext>`, replacing an older backup.
    #[default]
    Overwrite,
    /// Keep older backups and write to the first free name of
    /// `<stem>_backup.<ext>`, `<stem>_backup_1.<ext>`, `<stem>_backup_2.<ext>`, ...
    Numbered,
}

/// The deterministic backup name for `path`: `report.docx` -> `report_backup.docx`.
pub fn backup_path_for(path: &Path) -> PathBuf {
    with_stem_suffix(path, BACKUP_SUFFIX)
}

/// Copy `document` to its backup location according to `policy`.
///
/// Returns the path of the backup that was written.
pub fn make_backup(document: &TargetDocument, policy: BackupPolicy) -> Result<PathBuf> {
    let source = document.path();
    let backup = match policy {
        BackupPolicy::Overwrite => backup_path_for(source),
        BackupPolicy::Numbered => next_free_backup_path(source),
    };

    let bytes = copy_preserving_times(source, &backup)?;
    tracing::info!(
        "Backup written: {} ({bytes} bytes)",
        backup.display()
    );
    Ok(backup)
}

fn next_free_backup_path(path: &Path) -> PathBuf {
    let first = backup_path_for(path);
    if !first.exists() {
        return first;
    }
    (1u32..)
        .map(|n| with_stem_suffix(path, &format!("{BACKUP_SUFFIX}_{n}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

fn with_stem_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
    name.push(suffix);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// Copy file content, then carry over modification/access times and
/// permissions from `from`. Returns the number of bytes copied.
///
/// Permissions are applied last so that copying a read-only source still
/// leaves the destination writable long enough to set its timestamps.
///
/// Fails with [`io::ErrorKind::InvalidInput`] when `to` already refers to
/// `from` (the same path, a symlink or a hard link); creating the destination
/// would otherwise truncate the source.
pub fn copy_preserving_times(from: &Path, to: &Path) -> io::Result<u64> {
    let mut src = File::open(from)?;
    let meta = src.metadata()?;

    if to.exists() && same_file::is_same_file(from, to)? {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "'{}' and '{}' are the same file",
                from.display(),
                to.display()
            ),
        ));
    }

    let mut dst = File::create(to)?;
    let bytes = io::copy(&mut src, &mut dst)?;

    let mut times = FileTimes::new();
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    dst.set_times(times)?;
    drop(dst);

    fs::set_permissions(to, meta.permissions())?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, SystemTime};

    fn document(dir: &Path, name: &str, content: &[u8]) -> TargetDocument {
        let file = dir.join(name);
        fs::write(&file, content).unwrap();
        TargetDocument::validate(&file).unwrap()
    }

    #[test]
    fn test_backup_name() {
        assert_eq!(
            backup_path_for(Path::new("/docs/report.docx")),
            PathBuf::from("/docs/report_backup.docx")
        );
        assert_eq!(
            backup_path_for(Path::new("/docs/annual.report.docx")),
            PathBuf::from("/docs/annual.report_backup.docx")
        );
    }

    #[test]
    fn test_backup_has_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        let content = vec![7u8; 50 * 1024];
        let doc = document(dir.path(), "report.docx", &content);

        let backup = make_backup(&doc, BackupPolicy::Overwrite).unwrap();
        assert_eq!(backup.file_name().unwrap(), "report_backup.docx");
        assert_eq!(fs::read(&backup).unwrap(), content);
    }

    #[test]
    fn test_backup_keeps_modification_time() {
        let dir = tempfile::tempdir().unwrap();
        let doc = document(dir.path(), "report.docx", b"original");

        let past = SystemTime::now() - Duration::from_secs(3600 * 24);
        File::options()
            .write(true)
            .open(doc.path())
            .unwrap()
            .set_modified(past)
            .unwrap();

        let backup = make_backup(&doc, BackupPolicy::Overwrite).unwrap();
        let original_mtime = fs::metadata(doc.path()).unwrap().modified().unwrap();
        let backup_mtime = fs::metadata(&backup).unwrap().modified().unwrap();
        assert_eq!(original_mtime, backup_mtime);
    }

    #[test]
    fn test_overwrite_policy_replaces_previous_backup() {
        let dir = tempfile::tempdir().unwrap();
        let doc = document(dir.path(), "report.docx", b"first");
        make_backup(&doc, BackupPolicy::Overwrite).unwrap();

        fs::write(doc.path(), b"second").unwrap();
        let backup = make_backup(&doc, BackupPolicy::Overwrite).unwrap();

        assert_eq!(fs::read(&backup).unwrap(), b"second");
        assert!(!dir.path().join("report_backup_1.docx").exists());
    }

    #[test]
    fn test_numbered_policy_keeps_previous_backups() {
        let dir = tempfile::tempdir().unwrap();
        let doc = document(dir.path(), "report.docx", b"first");
        let b0 = make_backup(&doc, BackupPolicy::Numbered).unwrap();

        fs::write(doc.path(), b"second").unwrap();
        let b1 = make_backup(&doc, BackupPolicy::Numbered).unwrap();

        fs::write(doc.path(), b"third").unwrap();
        let b2 = make_backup(&doc, BackupPolicy::Numbered).unwrap();

        assert_eq!(b0.file_name().unwrap(), "report_backup.docx");
        assert_eq!(b1.file_name().unwrap(), "report_backup_1.docx");
        assert_eq!(b2.file_name().unwrap(), "report_backup_2.docx");
        assert_eq!(fs::read(&b0).unwrap(), b"first");
        assert_eq!(fs::read(&b1).unwrap(), b"second");
        assert_eq!(fs::read(&b2).unwrap(), b"third");
    }

    #[test]
    fn test_backup_hard_linked_to_document_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let doc = document(dir.path(), "report.docx", b"precious content");
        fs::hard_link(doc.path(), dir.path().join("report_backup.docx")).unwrap();

        let err = make_backup(&doc, BackupPolicy::Overwrite).unwrap_err();
        match err {
            Error::Io(e) => assert_eq!(e.kind(), io::ErrorKind::InvalidInput),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read(doc.path()).unwrap(), b"precious content");
    }

    #[cfg(unix)]
    #[test]
    fn test_backup_symlinked_to_document_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let doc = document(dir.path(), "report.docx", b"precious content");
        std::os::unix::fs::symlink(doc.path(), dir.path().join("report_backup.docx")).unwrap();

        assert!(make_backup(&doc, BackupPolicy::Overwrite).is_err());
        assert_eq!(fs::read(doc.path()).unwrap(), b"precious content");
    }

    #[test]
    fn test_copy_onto_itself_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.docx");
        fs::write(&src, b"keep me").unwrap();

        assert!(copy_preserving_times(&src, &src).is_err());
        assert_eq!(fs::read(&src).unwrap(), b"keep me");
    }

    #[test]
    fn test_copy_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.docx");
        fs::write(&src, b"x").unwrap();

        let err = copy_preserving_times(&src, &dir.path().join("nope").join("b.docx"));
        assert!(err.is_err());
    }
}
