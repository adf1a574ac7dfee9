//! Locating and invoking external office applications.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Find an executable.
///
/// An `explicit` program is used as-is when it names an existing file,
/// otherwise it is looked up like a bare name. Without an explicit program
/// each of `candidates` is tried in order. `search_path` replaces `PATH` for
/// the lookup when given.
pub fn locate_program<S: AsRef<str>>(
    explicit: Option<&Path>,
    candidates: &[S],
    search_path: Option<&OsStr>,
) -> Result<PathBuf> {
    if let Some(program) = explicit {
        if program.is_file() {
            return Ok(program.to_path_buf());
        }
        return find_on_path(program.as_os_str(), search_path)
            .ok_or_else(|| Error::missing(program.display().to_string()));
    }

    for name in candidates {
        if let Some(found) = find_on_path(OsStr::new(name.as_ref()), search_path) {
            tracing::debug!("Found {} at {}", name.as_ref(), found.display());
            return Ok(found);
        }
    }

    let names: Vec<&str> = candidates.iter().map(|c| c.as_ref()).collect();
    Err(Error::missing(names.join(" / ")))
}

fn find_on_path(name: &OsStr, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let found = match search_path {
        Some(paths) => {
            let cwd = std::env::current_dir().unwrap_or_default();
            which::which_in(name, Some(paths), cwd)
        }
        None => which::which(name),
    };
    found.ok()
}

/// A fully specified invocation of an external program.
///
/// Blocks until the program exits; the exit status is the only success
/// signal. Standard error is captured so it can be included in the
/// failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Run to completion. A non-zero exit becomes [`Error::FieldUpdate`].
    pub fn run(&self) -> Result<()> {
        tracing::debug!("Running: {self}");

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    Error::missing(self.program.display().to_string())
                } else {
                    Error::FieldUpdate(format!(
                        "failed to launch {}: {e}",
                        self.program.display()
                    ))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let mut message = format!("{} exited with {}", self.program.display(), output.status);
            if !stderr.is_empty() {
                message.push_str(": ");
                message.push_str(stderr);
            }
            return Err(Error::FieldUpdate(message));
        }

        Ok(())
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
