//! Platform dispatch: one [`Strategy`] per run, chosen from the platform or
//! the configuration.

use docx_fields_core::{FieldUpdater, Platform, Result, TargetDocument, UnsupportedUpdater};
use docx_fields_libreoffice::LibreOfficeUpdater;
use docx_fields_word::{WordCliUpdater, WordComUpdater};

use crate::config::{RefreshConfig, StrategyKind};

/// The closed set of field updaters.
#[derive(Debug, Clone)]
pub enum Strategy {
    WindowsCom(WordComUpdater),
    WindowsCli(WordCliUpdater),
    LinuxCli(LibreOfficeUpdater),
    Unsupported(UnsupportedUpdater),
}

impl Strategy {
    /// Pick the strategy for `platform`, unless `config.strategy` forces one.
    pub fn select(config: &RefreshConfig, platform: &Platform) -> Self {
        match config.strategy.or_else(|| StrategyKind::default_for(platform)) {
            Some(kind) => Self::build(kind, config),
            None => Strategy::Unsupported(UnsupportedUpdater {
                platform: platform.clone(),
            }),
        }
    }

    pub fn build(kind: StrategyKind, config: &RefreshConfig) -> Self {
        match kind {
            StrategyKind::WindowsCom => Strategy::WindowsCom(WordComUpdater::new(config.word_com.clone())),
            StrategyKind::WindowsCli => Strategy::WindowsCli(WordCliUpdater::new(config.word_cli.clone())),
            StrategyKind::LinuxCli => {
                Strategy::LinuxCli(LibreOfficeUpdater::new(config.libreoffice.clone()))
            }
        }
    }

    /// `None` for [`Strategy::Unsupported`].
    pub fn kind(&self) -> Option<StrategyKind> {
        match self {
            Strategy::WindowsCom(_) => Some(StrategyKind::WindowsCom),
            Strategy::WindowsCli(_) => Some(StrategyKind::WindowsCli),
            Strategy::LinuxCli(_) => Some(StrategyKind::LinuxCli),
            Strategy::Unsupported(_) => None,
        }
    }

    fn as_updater(&self) -> &dyn FieldUpdater {
        match self {
            Strategy::WindowsCom(u) => u,
            Strategy::WindowsCli(u) => u,
            Strategy::LinuxCli(u) => u,
            Strategy::Unsupported(u) => u,
        }
    }
}

impl FieldUpdater for Strategy {
    fn name(&self) -> &'static str {
        self.as_updater().name()
    }

    fn update(&self, document: &TargetDocument) -> Result<()> {
        self.as_updater().update(document)
    }
}
