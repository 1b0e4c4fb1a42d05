//! Block-level AST node definitions
//!
//!     Every element that takes at least a full line is a [`Block`]. The set is closed:
//!     adding a kind means adding a variant and handling it in every exhaustive match
//!     (serializer, resolution stages, visitors).
//!
//!     Blocks carry an attribute set (id, title, roles, options and any named or positional
//!     attribute from the metadata lines preceding the block) and a source [`Range`].
//!
//!     Containers:
//!         - Sections hold the blocks below their heading. See [section](section).
//!         - Lists hold items, items hold blocks. See [list](list).
//!         - Compound delimited blocks hold blocks. See [delimited](delimited).
//!
//!     Leaves:
//!         - Paragraphs hold lines of inline content. See [paragraph](paragraph).
//!         - Verbatim delimited blocks hold raw lines.
//!         - Images, tables, include directives, toc placeholders, attribute declarations.

pub mod delimited;
pub mod image;
pub mod include;
pub mod list;
pub mod paragraph;
pub mod section;
pub mod table;
pub mod toc;

pub use delimited::{BlockContent, DelimitedBlock, DelimitedKind};
pub use image::{BlockImage, ImageMacro};
pub use include::{IncludeError, IncludeMacro, LevelOffset};
pub use list::{BulletStyle, CheckStyle, List, ListItem, MAX_LIST_DEPTH};
pub use paragraph::Paragraph;
pub use section::Section;
pub use table::{Table, TableRow};
pub use toc::{TableOfContents, TocEntry, TocMacro};

use super::attributes::ElementAttributes;
use super::range::Range;
use serde::Serialize;

/// `:name: value` (or `:name!:` when `value` is `None`), kept in document order so
/// substitution sees definitions exactly where they were written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDeclaration {
    pub name: String,
    pub value: Option<String>,
    pub location: Range,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Block {
    Paragraph(Paragraph),
    List(List),
    Delimited(DelimitedBlock),
    Section(Section),
    Image(BlockImage),
    Table(Table),
    Include(IncludeMacro),
    IncludeError(IncludeError),
    TocMacro(TocMacro),
    TableOfContents(TableOfContents),
    AttributeDeclaration(AttributeDeclaration),
    ThematicBreak { location: Range },
}

impl Block {
    pub fn node_type(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "Paragraph",
            Block::List(_) => "List",
            Block::Delimited(_) => "DelimitedBlock",
            Block::Section(_) => "Section",
            Block::Image(_) => "BlockImage",
            Block::Table(_) => "Table",
            Block::Include(_) => "Include",
            Block::IncludeError(_) => "IncludeError",
            Block::TocMacro(_) => "TocMacro",
            Block::TableOfContents(_) => "TableOfContents",
            Block::AttributeDeclaration(_) => "AttributeDeclaration",
            Block::ThematicBreak { .. } => "ThematicBreak",
        }
    }

    pub fn range(&self) -> &Range {
        match self {
            Block::Paragraph(b) => &b.location,
            Block::List(b) => &b.location,
            Block::Delimited(b) => &b.location,
            Block::Section(b) => &b.location,
            Block::Image(b) => &b.location,
            Block::Table(b) => &b.location,
            Block::Include(b) => &b.location,
            Block::IncludeError(b) => &b.location,
            Block::TocMacro(b) => &b.location,
            Block::TableOfContents(b) => &b.location,
            Block::AttributeDeclaration(b) => &b.location,
            Block::ThematicBreak { location } => location,
        }
    }

    pub fn range_mut(&mut self) -> &mut Range {
        match self {
            Block::Paragraph(b) => &mut b.location,
            Block::List(b) => &mut b.location,
            Block::Delimited(b) => &mut b.location,
            Block::Section(b) => &mut b.location,
            Block::Image(b) => &mut b.location,
            Block::Table(b) => &mut b.location,
            Block::Include(b) => &mut b.location,
            Block::IncludeError(b) => &mut b.location,
            Block::TocMacro(b) => &mut b.location,
            Block::TableOfContents(b) => &mut b.location,
            Block::AttributeDeclaration(b) => &mut b.location,
            Block::ThematicBreak { location } => location,
        }
    }

    /// Attribute set, for the kinds that carry one.
    pub fn attributes(&self) -> Option<&ElementAttributes> {
        match self {
            Block::Paragraph(b) => Some(&b.attributes),
            Block::List(b) => Some(&b.attributes),
            Block::Delimited(b) => Some(&b.attributes),
            Block::Section(b) => Some(&b.attributes),
            Block::Image(b) => Some(&b.attributes),
            Block::Table(b) => Some(&b.attributes),
            Block::Include(b) => Some(&b.attributes),
            Block::TocMacro(b) => Some(&b.attributes),
            Block::IncludeError(_)
            | Block::TableOfContents(_)
            | Block::AttributeDeclaration(_)
            | Block::ThematicBreak { .. } => None,
        }
    }

    pub fn attributes_mut(&mut self) -> Option<&mut ElementAttributes> {
        match self {
            Block::Paragraph(b) => Some(&mut b.attributes),
            Block::List(b) => Some(&mut b.attributes),
            Block::Delimited(b) => Some(&mut b.attributes),
            Block::Section(b) => Some(&mut b.attributes),
            Block::Image(b) => Some(&mut b.attributes),
            Block::Table(b) => Some(&mut b.attributes),
            Block::Include(b) => Some(&mut b.attributes),
            Block::TocMacro(b) => Some(&mut b.attributes),
            Block::IncludeError(_)
            | Block::TableOfContents(_)
            | Block::AttributeDeclaration(_)
            | Block::ThematicBreak { .. } => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes().and_then(|a| a.id())
    }

    pub fn title(&self) -> Option<&str> {
        self.attributes().and_then(|a| a.title())
    }

    /// Child blocks of block containers. List items are not blocks; reach them through
    /// [`Block::List`].
    pub fn child_blocks_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Block::Section(section) => Some(&mut section.blocks),
            Block::Delimited(DelimitedBlock {
                content: BlockContent::Blocks(blocks),
                ..
            }) => Some(blocks),
            _ => None,
        }
    }
}
