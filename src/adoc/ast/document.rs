//! Document roots
//!
//!     [`DraftDocument`] is what the block parser produces: the block tree with every
//!     placeholder still unresolved, the parse-time warnings, and nothing else. It is
//!     consumed by [`DraftDocument::resolve`](crate::adoc::assembling), so the same draft
//!     can never be resolved twice.
//!
//!     [`Document`] is the final tree handed to renderers, together with the tables the
//!     resolution stages build: attributes in definition order, element references by id,
//!     and footnotes in first-use order.

use super::attributes::DocumentAttributes;
use super::diagnostics::Diagnostic;
use super::elements::{Block, BlockContent, DelimitedBlock, IncludeMacro, Section};
use super::inlines::{plain_text, InlineContent};
use super::traits::{walk_blocks, Visitor};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftDocument {
    /// `= Title` heading, when the document starts with one.
    pub title: Option<InlineContent>,
    pub blocks: Vec<Block>,
    pub warnings: Vec<Diagnostic>,
    pub source_name: Option<String>,
}

impl DraftDocument {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            title: None,
            blocks,
            warnings: Vec::new(),
            source_name: None,
        }
    }

    /// Attribute entries in document order, as `(name, value)`; unset entries have no value.
    pub fn attribute_entries(&self) -> Vec<(&str, Option<&str>)> {
        struct Entries<'a>(Vec<(&'a str, Option<&'a str>)>);
        impl<'a> Visitor<'a> for Entries<'a> {
            fn visit_block(&mut self, block: &'a Block) {
                if let Block::AttributeDeclaration(decl) = block {
                    self.0.push((&decl.name, decl.value.as_deref()));
                }
            }
        }
        let mut entries = Entries(Vec::new());
        walk_blocks(&mut entries, &self.blocks);
        entries.0
    }

    /// Include directives awaiting expansion.
    pub fn includes(&self) -> Vec<&IncludeMacro> {
        struct Includes<'a>(Vec<&'a IncludeMacro>);
        impl<'a> Visitor<'a> for Includes<'a> {
            fn visit_block(&mut self, block: &'a Block) {
                if let Block::Include(include) = block {
                    self.0.push(include);
                }
            }
        }
        let mut includes = Includes(Vec::new());
        walk_blocks(&mut includes, &self.blocks);
        includes.0
    }
}

/// Where an identifier points to in the final tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceTarget {
    pub kind: &'static str,
    pub title: Option<String>,
    /// Child indices from the root, see [`Document::block_at`].
    pub path: Vec<usize>,
}

pub type ElementReferences = BTreeMap<String, ReferenceTarget>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footnote {
    /// 1-based, in first-use order.
    pub index: usize,
    pub key: Option<String>,
    pub elements: InlineContent,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    pub title: Option<InlineContent>,
    pub attributes: DocumentAttributes,
    pub blocks: Vec<Block>,
    pub element_references: ElementReferences,
    pub footnotes: Vec<Footnote>,
    /// Footnote key → footnote index, for keyed footnotes used more than once.
    pub footnote_references: BTreeMap<String, usize>,
    pub last_updated: Option<String>,
}

impl Document {
    pub fn title_text(&self) -> Option<String> {
        self.title.as_ref().map(|t| plain_text(t))
    }

    /// Follow a reference path.
    ///
    /// Each step indexes the children of the current node: blocks of the root, of a
    /// section or of a compound delimited block. A list takes two steps: the item index,
    /// then the index into that item's elements.
    pub fn block_at(&self, path: &[usize]) -> Option<&Block> {
        let (first, mut rest) = path.split_first()?;
        let mut current = self.blocks.get(*first)?;
        while let Some((step, tail)) = rest.split_first() {
            current = match current {
                Block::Section(Section { blocks, .. })
                | Block::Delimited(DelimitedBlock {
                    content: BlockContent::Blocks(blocks),
                    ..
                }) => {
                    rest = tail;
                    blocks.get(*step)?
                }
                Block::List(list) => {
                    let (element, tail) = tail.split_first()?;
                    rest = tail;
                    list.items.get(*step)?.elements.get(*element)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn resolve_reference(&self, id: &str) -> Option<&Block> {
        let target = self.element_references.get(id)?;
        self.block_at(&target.path)
    }

    pub fn footnote(&self, index: usize) -> Option<&Footnote> {
        self.footnotes.iter().find(|f| f.index == index)
    }
}

/// A final document together with every recoverable problem found on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved {
    pub document: Document,
    pub warnings: Vec<Diagnostic>,
}

impl Resolved {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
