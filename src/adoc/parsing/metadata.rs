//! Block metadata
//!
//! Anchor, attribute and title lines don't produce nodes of their own. They accumulate
//! here until the next block is built, which takes them as its attribute set. Blank lines
//! between metadata and the block don't reset it.

use super::attribute_list::{block_attributes, set_title};
use crate::adoc::ast::attributes::{ElementAttributes, ATTR_REFTEXT};
use crate::adoc::lexing::{LineCursor, LineKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub attributes: ElementAttributes,
    /// Line index of the first metadata line, if any was read.
    pub start: Option<usize>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// Fold one metadata line into the set. Returns `false` for any other kind of line.
    pub fn apply(&mut self, kind: &LineKind) -> bool {
        match kind {
            LineKind::BlockAnchor { id, reftext } => {
                self.attributes.set_custom_id(id.as_str());
                if let Some(reftext) = reftext {
                    self.attributes.set(ATTR_REFTEXT, reftext.as_str());
                }
            }
            LineKind::BlockAttributes(text) => self.attributes.merge(block_attributes(text)),
            LineKind::BlockTitle(title) => set_title(&mut self.attributes, title),
            _ => return false,
        }
        true
    }

    pub fn into_attributes(self) -> ElementAttributes {
        self.attributes
    }
}

/// Read metadata lines under the cursor, along with any blank or comment lines between
/// them and the block they decorate.
pub fn collect_metadata(cursor: &mut LineCursor<'_>) -> Metadata {
    let mut metadata = Metadata::default();
    while let Some(line) = cursor.peek() {
        match &line.kind {
            kind if kind.is_metadata() => {
                metadata.start.get_or_insert(cursor.position());
                metadata.apply(kind);
            }
            LineKind::Blank | LineKind::Comment if !metadata.is_empty() => {}
            _ => break,
        }
        cursor.advance();
    }
    metadata
}
