//! The result of one run

use crate::metrics::FunctionRecord;
use crate::scope::BindingKind;
use core_types::{Diagnostic, Severity};
use serde::{Deserialize, Serialize};

/// An undeclared name and every line that referenced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpliedGlobal {
    /// The name
    pub name: String,
    /// Reference lines in source order
    pub lines: Vec<u32>,
}

/// A binding the unused walk flagged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnusedBinding {
    /// The name
    pub name: String,
    /// Declaration line
    pub line: u32,
    /// Declaration column
    pub character: u32,
    /// How it was declared
    pub kind: BindingKind,
}

/// Everything a run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintReport {
    /// True when no diagnostic was kept
    pub success: bool,
    /// Kept diagnostics in detection order
    pub diagnostics: Vec<Diagnostic>,
    /// Undeclared names referenced while `undef` was off
    pub implieds: Vec<ImpliedGlobal>,
    /// Unused bindings, whether or not `unused` was on
    pub unused: Vec<UnusedBinding>,
    /// Names declared at global scope
    pub globals: Vec<String>,
    /// Every function, in close order
    pub functions: Vec<FunctionRecord>,
}

impl LintReport {
    /// Number of error-severity diagnostics
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Diagnostic codes in order, handy for assertions
    pub fn codes(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.code.as_str()).collect()
    }
}
