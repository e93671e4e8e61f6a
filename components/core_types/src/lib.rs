//! Core value types shared by the lint engine and its callers.
//!
//! This crate provides the foundational types every other component speaks:
//! source positions, the diagnostic record the engine produces, and the
//! error taxonomy each diagnostic is classified under.
//!
//! # Overview
//!
//! - [`Diagnostic`] - One reported finding (line, character, code, message)
//! - [`Severity`] - Error, warning or informational
//! - [`ErrorKind`] - Which phase of analysis produced the finding
//! - [`SourcePosition`] - Source code location
//!
//! # Examples
//!
//! ```
//! use core_types::{Diagnostic, ErrorKind, Severity};
//!
//! let diag = Diagnostic::new(3, 14, "W033", "Missing semicolon.", ErrorKind::Syntax);
//! assert_eq!(diag.severity, Severity::Warning);
//! assert_eq!(diag.to_string(), "line 3, col 14, Missing semicolon. (W033)");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod diagnostic;
mod error;
mod source;

pub use diagnostic::{Diagnostic, Severity};
pub use error::ErrorKind;
pub use source::SourcePosition;
