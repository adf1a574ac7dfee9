//! Validate, back up, update: the whole run.

use std::path::{Path, PathBuf};

use docx_fields_core::{make_backup, FieldUpdater, Platform, Result, TargetDocument};

use crate::config::RefreshConfig;
use crate::strategy::Strategy;

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Canonical path of the refreshed document
    pub document: PathBuf,
    /// Where the pre-run copy was written
    pub backup: PathBuf,
    /// Name of the updater that ran
    pub strategy: &'static str,
}

/// Runs the validator, the backup manager and a field updater in sequence.
pub struct FieldRefresher<U = Strategy> {
    config: RefreshConfig,
    updater: U,
}

impl FieldRefresher<Strategy> {
    /// A refresher using the strategy for the current platform (or the one
    /// forced by `config.strategy`).
    pub fn new(config: RefreshConfig) -> Self {
        Self::for_platform(config, &Platform::current())
    }

    pub fn for_platform(config: RefreshConfig, platform: &Platform) -> Self {
        let updater = Strategy::select(&config, platform);
        Self { config, updater }
    }
}

impl<U: FieldUpdater> FieldRefresher<U> {
    /// A refresher with a caller-supplied updater.
    pub fn with_updater(config: RefreshConfig, updater: U) -> Self {
        Self { config, updater }
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    pub fn updater(&self) -> &U {
        &self.updater
    }

    /// Refresh all fields of the document at `path`.
    ///
    /// Nothing is written unless `path` validates. The backup is written
    /// before the updater runs and is left in place whatever the outcome.
    pub fn refresh(&self, path: impl AsRef<Path>) -> Result<RefreshOutcome> {
        let document = TargetDocument::validate_with_extension(path, &self.config.extension)
            .map_err(|e| {
                tracing::error!("{e}");
                e
            })?;

        let backup = make_backup(&document, self.config.backup).map_err(|e| {
            tracing::error!("Backup of {} failed: {e}", document.path().display());
            e
        })?;

        tracing::debug!("Using updater '{}'", self.updater.name());
        self.updater.update(&document)?;

        Ok(RefreshOutcome {
            document: document.into_path(),
            backup,
            strategy: self.updater.name(),
        })
    }
}

/// Refresh the fields of `path` with the default configuration for this
/// platform.
pub fn update_fields(path: impl AsRef<Path>) -> Result<RefreshOutcome> {
    FieldRefresher::new(RefreshConfig::default()).refresh(path)
}
