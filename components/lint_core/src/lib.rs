//! JavaScript Lint Engine
//!
//! Single-pass static analysis of JavaScript source: one parse drives every
//! check, reporting each finding the moment its evidence is complete.
//!
//! # Overview
//!
//! - [`lexer::Lexer`] - Tokenizes source, keeping comments for directives
//! - [`directive`] - Parses `jshint`/`globals`/`exported`/`ignore` comments
//! - [`OptionRegistry`] - Base options plus per-function directive overlays
//! - [`scope::ScopeTracker`] - Bindings, references and implied globals
//! - [`parser::Parser`] - Pratt parser carrying the inline checks
//! - [`metrics::MetricsCollector`] - Per-function size and complexity
//! - [`lint()`] - Runs all of the above and returns a [`LintReport`]
//!
//! # Example
//!
//! ```
//! use lint_core::{lint, OptionSet, PredefinedGlobals, SourceInput};
//!
//! let options = OptionSet::new().with("undef", true).with("unused", true);
//! let globals: PredefinedGlobals = serde_json::from_str(r#"["app"]"#).unwrap();
//!
//! let source = SourceInput::from("function start() { var unused; app.run(); }\nstart();");
//! let report = lint(&source, &options, Some(&globals));
//!
//! assert_eq!(report.codes(), vec!["W098"]);
//! assert_eq!(report.functions[0].name, "start");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod diagnostics;
pub mod directive;
pub mod error;
pub mod globals;
pub mod lexer;
pub mod lint;
pub mod messages;
pub mod metrics;
pub mod options;
pub mod parser;
pub mod patterns;
pub mod report;
pub mod scope;

mod expressions;
mod statements;

pub use core_types::{Diagnostic, ErrorKind, Severity};
pub use globals::PredefinedGlobals;
pub use lint::{lint, SourceInput};
pub use metrics::{FunctionMetrics, FunctionRecord};
pub use options::{ConfigError, OptionRegistry, OptionSet, OptionValue};
pub use report::{ImpliedGlobal, LintReport, UnusedBinding};
pub use scope::BindingKind;
