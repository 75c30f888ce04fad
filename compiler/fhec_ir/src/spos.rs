//! Source positions.

use std::fmt;

/// Source position carried on every node for diagnostics.
///
/// The file id indexes an externally owned file table (the driver's
/// concern); the core only threads positions through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Spos {
    pub file: u32,
    pub line: u32,
    pub col: u32,
}

impl Spos {
    /// Position for synthesized nodes with no source counterpart.
    pub const NONE: Self = Self {
        file: 0,
        line: 0,
        col: 0,
    };

    pub fn new(file: u32, line: u32, col: u32) -> Self {
        Self { file, line, col }
    }
}

impl fmt::Display for Spos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}
