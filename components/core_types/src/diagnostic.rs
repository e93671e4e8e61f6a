//! The diagnostic record produced by a lint run.

use crate::ErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is, derived from its code prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// `E` codes
    Error,
    /// `W` codes
    Warning,
    /// `I` codes
    Info,
}

impl Severity {
    /// Severity implied by a stable code such as `"W033"` or `"E001"`
    pub fn from_code(code: &str) -> Self {
        match code.as_bytes().first() {
            Some(b'E') => Severity::Error,
            Some(b'I') => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

/// One finding reported by the engine.
///
/// Diagnostics are appended in detection order and never mutated.
///
/// # Examples
///
/// ```
/// use core_types::{Diagnostic, ErrorKind, Severity};
///
/// let diag = Diagnostic::new(0, 0, "E001", "Bad option: 'foo'.", ErrorKind::Configuration);
/// assert_eq!(diag.severity, Severity::Error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Line number (1-indexed, 0 for run-level findings)
    pub line: u32,
    /// Column number (1-indexed)
    pub character: u32,
    /// Human-readable message
    pub message: String,
    /// Stable code, e.g. `W033`
    pub code: String,
    /// Severity, derived from the code
    pub severity: Severity,
    /// Phase of analysis that produced the finding
    pub kind: ErrorKind,
}

impl Diagnostic {
    /// Create a diagnostic; the severity is derived from `code`
    pub fn new(
        line: u32,
        character: u32,
        code: impl Into<String>,
        message: impl Into<String>,
        kind: ErrorKind,
    ) -> Self {
        let code = code.into();
        Self {
            line,
            character,
            message: message.into(),
            severity: Severity::from_code(&code),
            code,
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, col {}, {} ({})",
            self.line, self.character, self.message, self.code
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_code() {
        assert_eq!(Severity::from_code("E042"), Severity::Error);
        assert_eq!(Severity::from_code("W098"), Severity::Warning);
        assert_eq!(Severity::from_code("I001"), Severity::Info);
    }

    #[test]
    fn test_diagnostic_creation() {
        let diag = Diagnostic::new(2, 7, "W117", "'x' is not defined.", ErrorKind::Semantic);
        assert_eq!(diag.line, 2);
        assert_eq!(diag.character, 7);
        assert_eq!(diag.code, "W117");
        assert_eq!(diag.severity, Severity::Warning);
    }
}
