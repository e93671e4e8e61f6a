//! Diagnostics sink: the ignore list, ignore regions and the passfail halt.

use core_types::Diagnostic;
use std::collections::{BTreeSet, HashSet};

/// Collects diagnostics for one run.
///
/// Nothing is deduplicated; two findings at the same spot are both kept.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    ignored_codes: HashSet<String>,
    ignored_lines: BTreeSet<u32>,
    /// Closed `ignore:start` / `ignore:end` spans, inclusive
    regions: Vec<(u32, u32)>,
    open_region: Option<u32>,
    halted: bool,
}

impl DiagnosticSink {
    /// Empty sink with the run's base ignore codes
    pub fn new(ignored_codes: impl IntoIterator<Item = String>) -> Self {
        Self {
            ignored_codes: ignored_codes.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Record a diagnostic unless it is filtered out. Returns whether it was kept.
    pub fn record(&mut self, diagnostic: Diagnostic) -> bool {
        if self.halted || self.is_suppressed(&diagnostic) {
            return false;
        }
        self.diagnostics.push(diagnostic);
        true
    }

    /// Append the final `Stopping` diagnostic and refuse everything after it
    pub fn halt(&mut self, stopping: Diagnostic) {
        if !self.halted {
            self.diagnostics.push(stopping);
            self.halted = true;
        }
    }

    /// Whether [`halt`](Self::halt) has been called
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Drop `code` from here to the end of the run
    pub fn ignore_code(&mut self, code: impl Into<String>) {
        self.ignored_codes.insert(code.into());
    }

    /// `ignore:line`: suppress everything on `line`, findings already kept included
    pub fn ignore_line(&mut self, line: u32) {
        self.ignored_lines.insert(line);
        self.diagnostics.retain(|d| d.line != line);
    }

    /// `ignore:start`
    pub fn start_region(&mut self, line: u32) {
        if self.open_region.is_none() {
            self.open_region = Some(line);
            self.diagnostics.retain(|d| d.line != line);
        }
    }

    /// `ignore:end`; without a matching start it does nothing
    pub fn end_region(&mut self, line: u32) {
        if let Some(start) = self.open_region.take() {
            self.regions.push((start, line));
        }
    }

    fn is_suppressed(&self, diagnostic: &Diagnostic) -> bool {
        let line = diagnostic.line;
        self.ignored_codes.contains(&diagnostic.code)
            || self.ignored_lines.contains(&line)
            || self.open_region.map_or(false, |start| line >= start)
            || self
                .regions
                .iter()
                .any(|(start, end)| (*start..=*end).contains(&line))
    }

    /// Kept diagnostics in detection order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the sink
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
