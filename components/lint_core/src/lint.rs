//! The run entry point

use crate::globals::PredefinedGlobals;
use crate::options::OptionSet;
use crate::parser::Parser;
use crate::report::LintReport;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::debug;

/// Source handed to [`lint`], whole or pre-split into lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceInput {
    /// One string
    Text(String),
    /// Lines without their terminators
    Lines(Vec<String>),
}

impl SourceInput {
    /// The source as one string, lines joined with `\n`
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            SourceInput::Text(text) => Cow::Borrowed(text.as_str()),
            SourceInput::Lines(lines) => Cow::Owned(lines.join("\n")),
        }
    }
}

impl From<&str> for SourceInput {
    fn from(text: &str) -> Self {
        SourceInput::Text(text.to_string())
    }
}

impl From<String> for SourceInput {
    fn from(text: String) -> Self {
        SourceInput::Text(text)
    }
}

impl From<Vec<String>> for SourceInput {
    fn from(lines: Vec<String>) -> Self {
        SourceInput::Lines(lines)
    }
}

/// Lint one source under `options` and the caller's predefined globals
///
/// Never fails: lexical, syntactic and configuration problems all come back
/// as diagnostics in the report.
///
/// ```
/// use lint_core::{lint, OptionSet, SourceInput};
///
/// let report = lint(&SourceInput::from("var a = 1"), &OptionSet::new(), None);
/// assert!(!report.success);
/// assert_eq!(report.codes(), vec!["W033"]);
/// ```
pub fn lint(
    input: &SourceInput,
    options: &OptionSet,
    globals: Option<&PredefinedGlobals>,
) -> LintReport {
    let text = input.text();
    debug!(bytes = text.len(), options = options.len(), "lint start");
    let report = Parser::new(&text, options, globals).run();
    debug!(
        diagnostics = report.diagnostics.len(),
        functions = report.functions.len(),
        "lint finish"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_join() {
        let input = SourceInput::from(vec!["var a;".to_string(), "a = 1;".to_string()]);
        assert_eq!(input.text(), "var a;\na = 1;");
    }

    #[test]
    fn test_untagged_input() {
        let text: SourceInput = serde_json::from_str(r#""x;""#).unwrap();
        let lines: SourceInput = serde_json::from_str(r#"["x;", "y;"]"#).unwrap();
        assert_eq!(text, SourceInput::Text("x;".to_string()));
        assert!(matches!(lines, SourceInput::Lines(ref l) if l.len() == 2));
    }

    #[test]
    fn test_lines_and_text_agree() {
        let options = OptionSet::new().with("undef", true);
        let joined = lint(&SourceInput::from("foo();\nbar();"), &options, None);
        let split = lint(
            &SourceInput::from(vec!["foo();".to_string(), "bar();".to_string()]),
            &options,
            None,
        );
        assert_eq!(joined, split);
        assert_eq!(joined.codes(), vec!["W117", "W117"]);
    }
}
