//! Lexing
//!
//!     Line-level lexing for the block parser. Each input line is classified once, up front,
//!     into a [`LineKind`]; the block parser then works on those classified lines and never
//!     re-reads raw text except to hand line contents to the inline parser.
//!
//!     Inline tokens are produced separately, per line, by [`crate::adoc::inlines::tokens`].

pub mod line_classification;
pub mod source_lines;

pub use line_classification::{classify_line, LineKind};
pub use source_lines::{lines_range, source_lines, LineCursor, SourceLine};
