//! Source position type for diagnostics.

use serde::{Deserialize, Serialize};

/// Represents a position in source code.
///
/// Lines and columns are 1-indexed; line 0 is reserved for findings that
/// belong to the run rather than to any line (bad base options, for example).
///
/// # Examples
///
/// ```
/// use core_types::SourcePosition;
///
/// let pos = SourcePosition::new(10, 5, 150);
///
/// assert_eq!(pos.line, 10);
/// assert!(SourcePosition::run_level().is_run_level());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub column: u32,
    /// Character offset from the start of the source
    pub offset: usize,
}

impl SourcePosition {
    /// Create a position from its parts
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// The position used for findings that are not tied to a source line
    pub fn run_level() -> Self {
        Self::default()
    }

    /// True for [`SourcePosition::run_level`]
    pub fn is_run_level(&self) -> bool {
        self.line == 0
    }
}
