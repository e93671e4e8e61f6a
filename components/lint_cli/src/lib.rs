//! JavaScript Lint CLI Library
//!
//! Argument parsing, config loading and report printing for `corten-lint`.
//! All analysis happens in [`lint_core`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

pub use cli::{Cli, Reporter};
pub use config::LintConfig;
pub use error::{CliError, CliResult};
pub use runner::{FileReport, Outcome, Runner};
