//! Configuration for a refresh run.

use std::fmt;
use std::str::FromStr;

use docx_fields_core::{BackupPolicy, Platform, DEFAULT_EXTENSION};
use docx_fields_libreoffice::LibreOfficeConfig;
use docx_fields_word::{WordCliConfig, WordComConfig};

/// The concrete ways of updating fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Word via COM automation
    WindowsCom,
    /// `winword /mFilePrintDefault`
    WindowsCli,
    /// Headless LibreOffice conversion
    LinuxCli,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::WindowsCom,
        StrategyKind::WindowsCli,
        StrategyKind::LinuxCli,
    ];

    /// The strategy used on `platform` when none is configured.
    pub fn default_for(platform: &Platform) -> Option<Self> {
        match platform {
            Platform::Windows => Some(StrategyKind::WindowsCom),
            Platform::Linux => Some(StrategyKind::LinuxCli),
            Platform::MacOs | Platform::Other(_) => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::WindowsCom => "windows-com",
            StrategyKind::WindowsCli => "windows-cli",
            StrategyKind::LinuxCli => "linux-cli",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = StrategyKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown strategy '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// Everything a [`crate::FieldRefresher`] needs to know.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Required document extension, without the dot. Default: "docx".
    pub extension: String,
    pub backup: BackupPolicy,
    /// Forces a strategy instead of choosing by platform.
    pub strategy: Option<StrategyKind>,
    pub libreoffice: LibreOfficeConfig,
    pub word_com: WordComConfig,
    pub word_cli: WordCliConfig,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            backup: BackupPolicy::default(),
            strategy: None,
            libreoffice: LibreOfficeConfig::default(),
            word_com: WordComConfig::default(),
            word_cli: WordCliConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategy_per_platform() {
        assert_eq!(
            StrategyKind::default_for(&Platform::Windows),
            Some(StrategyKind::WindowsCom)
        );
        assert_eq!(
            StrategyKind::default_for(&Platform::Linux),
            Some(StrategyKind::LinuxCli)
        );
        assert_eq!(StrategyKind::default_for(&Platform::MacOs), None);
        assert_eq!(
            StrategyKind::default_for(&Platform::Other("freebsd".into())),
            None
        );
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("linux-cli".parse::<StrategyKind>(), Ok(StrategyKind::LinuxCli));
        assert_eq!("Windows-COM".parse::<StrategyKind>(), Ok(StrategyKind::WindowsCom));
        let err = "osx".parse::<StrategyKind>().unwrap_err();
        assert!(err.contains("windows-cli"), "{err}");
    }

    #[test]
    fn test_default_config() {
        let config = RefreshConfig::default();
        assert_eq!(config.extension, "docx");
        assert_eq!(config.backup, BackupPolicy::Overwrite);
        assert!(config.strategy.is_none());
    }
}
