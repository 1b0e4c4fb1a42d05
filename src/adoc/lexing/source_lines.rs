//! Classified source lines
//!
//! Splits the input into lines (accepting `\n` and `\r\n`), classifies each one and keeps
//! its position so that blocks can report where they came from. [`LineCursor`] is the
//! parser's read head over those lines.

use super::line_classification::{classify_line, LineKind};
use crate::adoc::ast::range::{Position, Range};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// Zero-based line number in the source.
    pub number: usize,
    /// Byte offset of the first character.
    pub offset: usize,
    /// Line text without its terminator.
    pub text: String,
    pub kind: LineKind,
}

impl SourceLine {
    pub fn range(&self) -> Range {
        Range::new(
            self.offset..self.offset + self.text.len(),
            Position::new(self.number, 0),
            Position::new(self.number, self.text.len()),
        )
    }
}

/// Split and classify every line of `source`.
pub fn source_lines(source: &str) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for (number, raw) in source.split_inclusive('\n').enumerate() {
        let text = raw
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(raw);
        lines.push(SourceLine {
            number,
            offset,
            text: text.to_string(),
            kind: classify_line(text),
        });
        offset += raw.len();
    }
    lines
}

/// Range covering `lines` from the first to the last.
pub fn lines_range(lines: &[SourceLine]) -> Range {
    match (lines.first(), lines.last()) {
        (Some(first), Some(last)) => {
            let (start, end) = (first.range(), last.range());
            Range::new(start.span.start..end.span.end, start.start, end.end)
        }
        _ => Range::default(),
    }
}

/// Read head over classified lines with single-line lookahead.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: &'a [SourceLine],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(lines: &'a [SourceLine]) -> Self {
        Self { lines, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'a SourceLine> {
        self.lines.get(self.pos)
    }

    pub fn peek_kind(&self) -> Option<&'a LineKind> {
        self.peek().map(|line| &line.kind)
    }

    pub fn advance(&mut self) -> Option<&'a SourceLine> {
        let line = self.lines.get(self.pos)?;
        self.pos += 1;
        Some(line)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn reset_to(&mut self, pos: usize) {
        self.pos = pos.min(self.lines.len());
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Lines consumed between `start` and the current position.
    pub fn consumed_since(&self, start: usize) -> &'a [SourceLine] {
        &self.lines[start.min(self.pos)..self.pos]
    }

    /// Position of the first line at or after the cursor that satisfies `pred`.
    pub fn find(&self, pred: impl Fn(&SourceLine) -> bool) -> Option<usize> {
        self.lines[self.pos..]
            .iter()
            .position(pred)
            .map(|offset| self.pos + offset)
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a [SourceLine] {
        &self.lines[start.min(self.lines.len())..end.min(self.lines.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_lines_track_offsets() {
        let lines = source_lines("a\r\n\nbc\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "a");
        assert_eq!(lines[1].kind, LineKind::Blank);
        assert_eq!(lines[2].offset, 4);
        assert_eq!(lines[2].range().end, Position::new(2, 2));
    }

    #[test]
    fn test_missing_final_newline() {
        let lines = source_lines("one\ntwo");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, "two");
    }

    #[test]
    fn test_cursor_lookahead() {
        let lines = source_lines("a\nb\n");
        let mut cursor = LineCursor::new(&lines);
        assert_eq!(cursor.peek().map(|l| l.text.as_str()), Some("a"));
        cursor.advance();
        assert_eq!(cursor.peek().map(|l| l.text.as_str()), Some("b"));
        assert_eq!(cursor.consumed_since(0).len(), 1);
        cursor.advance();
        assert!(cursor.is_at_end());
        assert!(cursor.advance().is_none());
    }

    #[test]
    fn test_lines_range_spans_block() {
        let lines = source_lines("first\nsecond\n");
        let range = lines_range(&lines);
        assert_eq!(range.start, Position::new(0, 0));
        assert_eq!(range.end, Position::new(1, 6));
        assert_eq!(range.span, 0..12);
    }
}
