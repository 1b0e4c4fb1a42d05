//! Delimited blocks
//!
//!     A fenced region whose opening and closing delimiter lines are identical. Verbatim
//!     kinds (listing, literal, passthrough) keep their lines untouched; compound kinds
//!     (example, quote, sidebar, open) hold further parsed blocks.
//!
//!     Comment blocks never reach the tree. Tables share the fence syntax (`|===`) but
//!     become [`Table`](super::table::Table) nodes.

use super::super::attributes::ElementAttributes;
use super::super::range::Range;
use super::Block;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DelimitedKind {
    Listing,
    Literal,
    Example,
    Quote,
    Sidebar,
    Passthrough,
    Comment,
    Open,
    Table,
}

impl DelimitedKind {
    /// Kind for a fence line, if it is one.
    pub fn from_fence(fence: &str) -> Option<Self> {
        if fence == "--" {
            return Some(DelimitedKind::Open);
        }
        if fence.len() >= 4 && fence.starts_with("|=") && fence[1..].chars().all(|c| c == '=') {
            return Some(DelimitedKind::Table);
        }
        let first = fence.chars().next()?;
        if fence.chars().count() < 4 || !fence.chars().all(|c| c == first) {
            return None;
        }
        match first {
            '-' => Some(DelimitedKind::Listing),
            '.' => Some(DelimitedKind::Literal),
            '=' => Some(DelimitedKind::Example),
            '_' => Some(DelimitedKind::Quote),
            '*' => Some(DelimitedKind::Sidebar),
            '+' => Some(DelimitedKind::Passthrough),
            '/' => Some(DelimitedKind::Comment),
            _ => None,
        }
    }

    /// Canonical fence for this kind.
    pub fn fence(self) -> &'static str {
        match self {
            DelimitedKind::Listing => "----",
            DelimitedKind::Literal => "....",
            DelimitedKind::Example => "====",
            DelimitedKind::Quote => "____",
            DelimitedKind::Sidebar => "****",
            DelimitedKind::Passthrough => "++++",
            DelimitedKind::Comment => "////",
            DelimitedKind::Open => "--",
            DelimitedKind::Table => "|===",
        }
    }

    pub fn is_verbatim(self) -> bool {
        matches!(
            self,
            DelimitedKind::Listing
                | DelimitedKind::Literal
                | DelimitedKind::Passthrough
                | DelimitedKind::Comment
        )
    }
}

impl fmt::Display for DelimitedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DelimitedKind::Listing => "listing",
            DelimitedKind::Literal => "literal",
            DelimitedKind::Example => "example",
            DelimitedKind::Quote => "quote",
            DelimitedKind::Sidebar => "sidebar",
            DelimitedKind::Passthrough => "passthrough",
            DelimitedKind::Comment => "comment",
            DelimitedKind::Open => "open",
            DelimitedKind::Table => "table",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum BlockContent {
    Verbatim(Vec<String>),
    Blocks(Vec<Block>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelimitedBlock {
    pub kind: DelimitedKind,
    pub attributes: ElementAttributes,
    pub content: BlockContent,
    pub location: Range,
}

impl DelimitedBlock {
    pub fn verbatim(kind: DelimitedKind, lines: Vec<String>) -> Self {
        Self {
            kind,
            attributes: ElementAttributes::new(),
            content: BlockContent::Verbatim(lines),
            location: Range::default(),
        }
    }

    pub fn compound(kind: DelimitedKind, blocks: Vec<Block>) -> Self {
        Self {
            kind,
            attributes: ElementAttributes::new(),
            content: BlockContent::Blocks(blocks),
            location: Range::default(),
        }
    }

    /// Preferred builder
    pub fn at(mut self, location: Range) -> Self {
        self.location = location;
        self
    }

    pub fn lines(&self) -> Option<&[String]> {
        match &self.content {
            BlockContent::Verbatim(lines) => Some(lines),
            BlockContent::Blocks(_) => None,
        }
    }

    pub fn blocks(&self) -> Option<&[Block]> {
        match &self.content {
            BlockContent::Blocks(blocks) => Some(blocks),
            BlockContent::Verbatim(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_kinds() {
        assert_eq!(DelimitedKind::from_fence("----"), Some(DelimitedKind::Listing));
        assert_eq!(DelimitedKind::from_fence("......"), Some(DelimitedKind::Literal));
        assert_eq!(DelimitedKind::from_fence("|==="), Some(DelimitedKind::Table));
        assert_eq!(DelimitedKind::from_fence("--"), Some(DelimitedKind::Open));
        assert_eq!(DelimitedKind::from_fence("---"), None);
        assert_eq!(DelimitedKind::from_fence("-=-="), None);
    }
}
