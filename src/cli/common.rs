//! Shared CLI plumbing: error type, exit codes and catalog loading.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::brands::BrandAliases;
use crate::catalog::{resolve_data_dir, Catalog};
use crate::config::Config;

/// Process exit codes used by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Invalid input, or the command found problems
    ValidationError = 1,
    /// File system or serialization failure
    IoError = 2,
}

impl ExitCode {
    /// Numeric code passed to the OS.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Kind of CLI failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorKind {
    /// Bad arguments or findings worth a non-zero exit
    Validation,
    /// Could not read or write something
    Io,
}

/// Error returned by a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Failure kind, determines the exit code
    pub kind: CliErrorKind,
    /// Message shown on stderr
    pub message: String,
}

impl CliError {
    /// Invalid input or findings.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Validation,
            message: message.into(),
        }
    }

    /// I/O or serialization failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Io,
            message: message.into(),
        }
    }

    /// Exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self.kind {
            CliErrorKind::Validation => ExitCode::ValidationError,
            CliErrorKind::Io => ExitCode::IoError,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type of CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Options shared by every command that reads the catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    /// `--data-dir` override
    pub data_dir: Option<PathBuf>,
}

/// Everything a catalog command needs.
#[derive(Debug)]
pub struct CatalogContext {
    /// Loaded configuration
    pub config: Config,
    /// Brand alias table
    pub aliases: BrandAliases,
    /// Loaded catalog
    pub catalog: Catalog,
    /// Directory the catalog came from
    pub data_dir: PathBuf,
}

impl CatalogSource {
    /// Creates a source with an optional data directory override.
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        Self { data_dir }
    }

    /// Loads the configuration only.
    pub fn config(&self) -> CliResult<Config> {
        Config::load()
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))
    }

    /// Loads configuration, brand aliases and the catalog.
    pub fn load(&self) -> CliResult<CatalogContext> {
        let config = self.config()?;
        let data_dir = resolve_data_dir(self.data_dir.as_deref(), &config.catalog.data_dir);
        let aliases = load_aliases()?;
        let catalog = load_catalog(&data_dir)?;

        Ok(CatalogContext {
            config,
            aliases,
            catalog,
            data_dir,
        })
    }
}

/// Loads the compiled-in brand alias table.
pub fn load_aliases() -> CliResult<BrandAliases> {
    BrandAliases::load().map_err(|e| CliError::io(format!("Failed to load brand aliases: {e:#}")))
}

fn load_catalog(data_dir: &Path) -> CliResult<Catalog> {
    Catalog::load_dir(data_dir)
        .map_err(|e| CliError::io(format!("Failed to load catalog: {e:#}")))
}
