//! Classification of analysis findings.
//!
//! Every diagnostic the engine reports falls into one of these kinds. Only
//! the kind decides how the engine recovers; it never decides whether the
//! finding is reported.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The phase of analysis a diagnostic came from.
///
/// # Examples
///
/// ```
/// use core_types::ErrorKind;
///
/// assert!(ErrorKind::Syntax.abandons_statement());
/// assert!(!ErrorKind::Semantic.abandons_statement());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Malformed token: unterminated string or comment, bad escape, bad number
    Lex,
    /// Unexpected token in statement or expression position
    Syntax,
    /// Redefinition, late use, unused binding, forbidden construct, exceeded metric
    Semantic,
    /// Unknown option, malformed option value, option used out of scope
    Configuration,
}

impl ErrorKind {
    /// Whether a finding of this kind makes the parser give up on the
    /// statement it is in.
    pub fn abandons_statement(self) -> bool {
        matches!(self, ErrorKind::Syntax)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Lex => "lex",
            ErrorKind::Syntax => "syntax",
            ErrorKind::Semantic => "semantic",
            ErrorKind::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_variants() {
        let _lex = ErrorKind::Lex;
        let _syntax = ErrorKind::Syntax;
        let _semantic = ErrorKind::Semantic;
        let _config = ErrorKind::Configuration;
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::Configuration.to_string(), "configuration");
        assert_eq!(ErrorKind::Lex.to_string(), "lex");
    }
}
