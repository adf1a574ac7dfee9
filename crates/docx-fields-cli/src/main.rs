//! docx-fields CLI - refresh fields in Word documents

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use docx_fields::prelude::*;
use docx_fields::{InvalidReason, Strategy, DEFAULT_EXTENSION};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docx-fields")]
#[command(
    author,
    version,
    about = "Refresh page numbers, tables of contents and cross-references in Word documents"
)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update all fields of a document in place (a backup is written first)
    Update {
        /// Document to update (default: ../samples/input.docx)
        path: Option<PathBuf>,

        /// Force a strategy: windows-com, windows-cli or linux-cli
        #[arg(short, long)]
        strategy: Option<StrategyKind>,

        /// What to do with backups from earlier runs
        #[arg(short, long, value_enum, default_value_t = BackupArg::Overwrite)]
        backup_policy: BackupArg,

        /// LibreOffice executable (default: libreoffice or soffice on PATH)
        #[arg(long)]
        soffice: Option<PathBuf>,

        /// Word executable for the windows-cli strategy (default: winword on PATH)
        #[arg(long)]
        winword: Option<PathBuf>,

        /// Required document extension
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,
    },

    /// Show the detected platform and the strategy that would be used
    Detect,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackupArg {
    /// Replace <name>_backup.docx on every run
    Overwrite,
    /// Keep earlier backups as <name>_backup_1.docx, <name>_backup_2.docx, ...
    Numbered,
}

impl From<BackupArg> for BackupPolicy {
    fn from(arg: BackupArg) -> Self {
        match arg {
            BackupArg::Overwrite => BackupPolicy::Overwrite,
            BackupArg::Numbered => BackupPolicy::Numbered,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Update {
            path,
            strategy,
            backup_policy,
            soffice,
            winword,
            extension,
        } => {
            let mut config = RefreshConfig {
                extension,
                backup: backup_policy.into(),
                strategy,
                ..Default::default()
            };
            config.libreoffice.program = soffice;
            config.word_cli.program = winword;
            update(path, config)
        }
        Commands::Detect => detect(),
    }
}

/// `RUST_LOG` wins; otherwise the level follows -v / -q.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_document_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"..\samples\input.docx")
    } else {
        PathBuf::from("../samples/input.docx")
    }
}

/// The path to work on: the argument if given, else the sample document if
/// it exists.
fn resolve_input(path: Option<PathBuf>) -> Result<PathBuf, Error> {
    match path {
        Some(path) => Ok(path),
        None => {
            let default = default_document_path();
            if default.exists() {
                tracing::debug!("No path given, using {}", default.display());
                Ok(default)
            } else {
                Err(Error::invalid_document(default, InvalidReason::NoPath))
            }
        }
    }
}

fn update(path: Option<PathBuf>, config: RefreshConfig) -> Result<()> {
    let input = resolve_input(path)?;
    let refresher = FieldRefresher::new(config);

    let outcome = refresher
        .refresh(&input)
        .with_context(|| format!("Failed to update fields in '{}'", input.display()))?;

    println!("Updated: {}", outcome.document.display());
    println!("Backup:  {}", outcome.backup.display());
    println!("Strategy: {}", outcome.strategy);
    Ok(())
}

fn detect() -> Result<()> {
    let platform = Platform::current();
    let strategy = Strategy::select(&RefreshConfig::default(), &platform);

    println!("Platform: {platform}");
    match strategy.kind() {
        Some(kind) => println!("Strategy: {kind}"),
        None => println!("Strategy: none (unsupported platform)"),
    }
    Ok(())
}
