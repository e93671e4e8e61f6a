//! Lints files and prints their reports

use crate::cli::{Cli, Reporter};
use crate::config::LintConfig;
use crate::error::{CliError, CliResult};
use lint_core::{lint, LintReport, SourceInput};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The report for one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// File as given on the command line
    pub file: PathBuf,
    /// Engine output
    pub report: LintReport,
}

/// Overall result of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No file produced a diagnostic
    Clean,
    /// At least one diagnostic was reported
    Findings,
}

impl Outcome {
    /// Process exit code: 0 clean, 1 findings
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Clean => 0,
            Outcome::Findings => 1,
        }
    }
}

/// Applies one configuration to a list of files
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: LintConfig,
}

impl Runner {
    /// Create a runner for an already-built configuration
    pub fn new(config: LintConfig) -> Self {
        Self { config }
    }

    /// Load `--config` (if any) and layer the `--option` overrides on top
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let mut config = match &cli.config {
            Some(path) => LintConfig::load(path)?,
            None => LintConfig::default(),
        };
        for raw in &cli.options {
            config.apply_override(raw)?;
        }
        Ok(Self::new(config))
    }

    /// The effective configuration
    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Lint source text that is already in memory
    pub fn lint_source(&self, file: &Path, text: &str) -> FileReport {
        let report = lint(
            &SourceInput::from(text),
            &self.config.options,
            self.config.globals.as_ref(),
        );
        info!(
            file = %file.display(),
            diagnostics = report.diagnostics.len(),
            "linted"
        );
        FileReport {
            file: file.to_path_buf(),
            report,
        }
    }

    /// Read and lint one file
    pub fn lint_file(&self, file: &Path) -> CliResult<FileReport> {
        let text = std::fs::read_to_string(file).map_err(|source| CliError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        Ok(self.lint_source(file, &text))
    }

    /// Lint every file and write the reports to `out`
    ///
    /// A file that cannot be read stops the run before anything is printed.
    pub fn run<W: Write>(
        &self,
        files: &[PathBuf],
        reporter: Reporter,
        out: &mut W,
    ) -> CliResult<Outcome> {
        let reports = files
            .iter()
            .map(|file| self.lint_file(file))
            .collect::<CliResult<Vec<_>>>()?;

        match reporter {
            Reporter::Text => write_text(&reports, out)?,
            Reporter::Json => write_json(&reports, out)?,
        }

        let outcome = if reports.iter().all(|r| r.report.success) {
            Outcome::Clean
        } else {
            Outcome::Findings
        };
        debug!(files = reports.len(), ?outcome, "run finished");
        Ok(outcome)
    }
}

/// `path: line N, col C, message (CODE)` per diagnostic, then a count
pub fn write_text<W: Write>(reports: &[FileReport], out: &mut W) -> CliResult<()> {
    let mut total = 0;
    for file in reports {
        for diagnostic in &file.report.diagnostics {
            writeln!(out, "{}: {}", file.file.display(), diagnostic)?;
            total += 1;
        }
    }
    if total > 0 {
        let plural = if total == 1 { "" } else { "s" };
        writeln!(out, "\n{total} error{plural}")?;
    }
    Ok(())
}

/// All reports as one pretty-printed JSON array
pub fn write_json<W: Write>(reports: &[FileReport], out: &mut W) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out)?;
    Ok(())
}
