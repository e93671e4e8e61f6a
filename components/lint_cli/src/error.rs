//! Error types for the CLI

use lint_core::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific errors
///
/// Findings in linted code are never errors here; they travel in the report.
#[derive(Debug, Error)]
pub enum CliError {
    /// A source or config file could not be read
    #[error("could not read '{}': {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON of the expected shape
    #[error("invalid config '{}': {source}", path.display())]
    Config {
        /// Config file
        path: PathBuf,
        /// Decoding failure
        #[source]
        source: serde_json::Error,
    },

    /// An `--option` override was rejected by the option catalogue
    #[error("bad option '{raw}': {source}")]
    BadOption {
        /// The override as given
        raw: String,
        /// Catalogue rejection
        #[source]
        source: ConfigError,
    },

    /// An `--option` override is not of the form `key=value`
    #[error("bad option '{0}': expected key=value")]
    Usage(String),

    /// Writing the report failed
    #[error("could not write report: {0}")]
    Output(#[from] std::io::Error),

    /// Encoding the JSON report failed
    #[error("could not encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
