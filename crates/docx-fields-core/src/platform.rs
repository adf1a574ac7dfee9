//! Host operating system detection.

use std::fmt;

/// Operating systems the dispatcher distinguishes between.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    /// Anything else, carrying the `std::env::consts::OS` name
    Other(String),
}

impl Platform {
    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os_name(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            other => Platform::Other(other.to_string()),
        }
    }

    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    pub fn name(&self) -> &str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
