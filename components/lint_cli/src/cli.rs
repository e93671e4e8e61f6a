//! Command-line arguments

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

/// Lint JavaScript files
#[derive(Parser, Debug)]
#[command(name = "corten-lint")]
#[command(version, about = "Single-pass JavaScript linter", long_about = None)]
pub struct Cli {
    /// JavaScript files to lint
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// JSON config of the form {"options": {...}, "globals": {...} | [...]}
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override one option, e.g. `undef=true`, `maxlen=80`, `-W033=true`
    #[arg(
        short = 'o',
        long = "option",
        value_name = "KEY=VALUE",
        allow_hyphen_values = true
    )]
    pub options: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Reporter::Text)]
    pub reporter: Reporter,

    /// Log more to stderr (repeat for more detail)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// How reports are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Reporter {
    /// `path: line N, col C, message (CODE)` per finding
    Text,
    /// One JSON array of `{file, report}` objects
    Json,
}

impl Cli {
    /// Log level selected by `-v` flags
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
