//! Source positions.

use std::fmt;
use std::sync::Arc;

/// Location of a node in its source unit.
///
/// The unit is the identity of the file (or other source) the node was
/// parsed from. Private function names are qualified with it, so two units
/// can each declare a like-named private helper.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub unit: Arc<str>,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Unit name used for nodes synthesized by the host.
    pub const HOST_UNIT: &'static str = "<host>";

    pub fn new(unit: impl Into<Arc<str>>, line: u32, column: u32) -> Self {
        Position {
            unit: unit.into(),
            line,
            column,
        }
    }

    /// Position for nodes that have no source text.
    pub fn host() -> Self {
        Position::new(Self::HOST_UNIT, 0, 0)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::host()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.unit, self.line, self.column)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
