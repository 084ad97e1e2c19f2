//! Position information for the AST.

use std::cmp::{Ord, Ordering, PartialOrd};
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::ops::RangeInclusive;

/// A single point in the source text.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct Location {
    /// Index within the source text
    index: u32,
    /// Line within the source text (1-indexed)
    line: u32,
    /// Column within the source text (1-indexed)
    column: u32,
}

impl Location {
    pub fn new(index: u32, line: u32, column: u32) -> Location {
        Location { index, line, column }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// The location `offset` characters later on the same line.
    pub fn offset(self, offset: u32) -> Location {
        Location {
            index: self.index + offset,
            line: self.line,
            column: self.column + offset
        }
    }
}

impl Debug for Location {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "(line: {}, col: {})", self.line, self.column)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Location) -> Option<Ordering> {
        self.index.partial_cmp(&other.index)
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Location) -> Ordering {
        self.index.cmp(&other.index)
    }
}

/// The area of source text covered by a node in the AST.
///
/// Spans may cover part of one line or run over several.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct Span {
    start: Location,
    end: Location
}

impl Span {
    pub fn new(start: Location, end: Location) -> Span {
        Span { start, end }
    }

    /// A span starting at `start` and covering `len` characters of one line.
    pub fn from_location(start: Location, len: u32) -> Span {
        Span { start, end: start.offset(len) }
    }

    pub fn start(&self) -> Location {
        self.start
    }

    pub fn end(&self) -> Location {
        self.end
    }

    pub fn len(&self) -> u32 {
        self.end.index - self.start.index
    }

    pub fn is_multiline(&self) -> bool {
        self.end.line > self.start.line
    }

    /// The smallest span covering both `self` and `other`.
    pub fn merge(&self, other: Span) -> Span {
        Span {
            start: if self.start <= other.start { self.start } else { other.start },
            end: if self.end >= other.end { self.end } else { other.end }
        }
    }
}

impl From<RangeInclusive<Location>> for Span {
    fn from(r: RangeInclusive<Location>) -> Span {
        Span { start: *r.start(), end: *r.end() }
    }
}

impl From<RangeInclusive<Span>> for Span {
    fn from(r: RangeInclusive<Span>) -> Span {
        Span { start: r.start().start, end: r.end().end }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        if self.is_multiline() {
            write!(f, "{} to {}", self.start, self.end)
        }
        else {
            write!(f, "line {}, column {} to {}",
                   self.start.line, self.start.column, self.end.column)
        }
    }
}
