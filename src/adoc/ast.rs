//! Abstract syntax tree
//!
//!     Two closed tagged unions make up the tree: [`Block`] for line-based elements and
//!     [`Inline`] for content inside a line. The draft and final document roots live in
//!     [document](document).
//!
//!     Ownership is strictly top-down. Tables that point back into the tree
//!     (element references, footnote indices) store ids and child-index paths, never
//!     pointers, since the tree is rebuilt on the way from draft to final.

pub mod attributes;
pub mod diagnostics;
pub mod document;
pub mod elements;
pub mod error;
pub mod inlines;
pub mod range;
pub mod traits;

pub use attributes::{DocumentAttributes, ElementAttributes};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSeverity};
pub use document::{
    Document, DraftDocument, ElementReferences, Footnote, ReferenceTarget, Resolved,
};
pub use elements::{
    AttributeDeclaration, Block, BlockContent, BlockImage, BulletStyle, CheckStyle,
    DelimitedBlock, DelimitedKind, ImageMacro, IncludeError, IncludeMacro, List, ListItem,
    Paragraph, Section, Table, TableOfContents, TableRow, TocEntry, TocMacro,
};
pub use error::ParseError;
pub use inlines::{
    CrossReference, FootnoteRef, Inline, InlineContent, Link, QuoteKind, QuotedText, XrefStatus,
};
pub use range::{Position, Range};
pub use traits::Visitor;
