//! Core position types

use serde::{Deserialize, Serialize};

/// A location in source text (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset from start of source
    pub offset: usize,
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

/// A range in source text from start to end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// Start location (inclusive)
    pub start: Location,
    /// End location (exclusive)
    pub end: Location,
}

impl Location {
    pub fn new(offset: usize, row: usize, column: usize) -> Self {
        Location { offset, row, column }
    }
}

impl Range {
    /// A range covering whole lines, with unknown offsets.
    ///
    /// `first_row` and `last_row` are 0-indexed.
    pub fn lines(first_row: usize, last_row: usize) -> Self {
        Range {
            start: Location::new(0, first_row, 0),
            end: Location::new(0, last_row, 0),
        }
    }

    /// The smallest range containing both `self` and `other`.
    pub fn span(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}
