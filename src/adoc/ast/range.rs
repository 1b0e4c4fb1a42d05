//! Source positions
//!
//! Every block carries a [`Range`] so that diagnostics raised long after parsing (during
//! resolution) can still point at the offending source. Positions are zero-based; the
//! diagnostic display adds one to the line number.
//!
//! Ranges are line-granular: the lexer hands out one range per source line and block
//! ranges are the bounding box of the lines they consumed. After include expansion the
//! ranges of spliced blocks refer to the included file, not to the including one.

use serde::Serialize;
use std::fmt;
use std::ops::Range as ByteRange;

/// Line and column, both zero-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte span plus the positions of its two ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub span: ByteRange<usize>,
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(span: ByteRange<usize>, start: Position, end: Position) -> Self {
        Self { span, start, end }
    }

    /// Number of source lines touched.
    pub fn line_count(&self) -> usize {
        self.end.line.saturating_sub(self.start.line) + 1
    }

    /// Smallest range covering all of `ranges`, or `None` when there are none.
    pub fn bounding_box<'a, I>(mut ranges: I) -> Option<Range>
    where
        I: Iterator<Item = &'a Range>,
    {
        let first = ranges.next()?.clone();
        Some(ranges.fold(first, |acc, range| {
            let (span_start, start) = if range.start < acc.start {
                (range.span.start, range.start)
            } else {
                (acc.span.start, acc.start)
            };
            let (span_end, end) = if range.end > acc.end {
                (range.span.end, range.end)
            } else {
                (acc.span.end, acc.end)
            };
            Range::new(span_start..span_end, start, end)
        }))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::new(0..0, Position::default(), Position::default())
    }
}
