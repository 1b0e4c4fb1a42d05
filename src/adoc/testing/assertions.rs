//! Fluent assertion API for tree nodes

use super::matchers::TextMatch;
use crate::adoc::ast::document::{Document, DraftDocument, Resolved};
use crate::adoc::ast::elements::{
    Block, BlockImage, BulletStyle, CheckStyle, DelimitedBlock, DelimitedKind, List, ListItem,
    Paragraph, Section, Table,
};
use crate::adoc::ast::inlines::{plain_text, Inline};

// ============================================================================
// Entry Point
// ============================================================================

/// Anything holding a top-level block sequence.
pub trait BlockTree {
    fn blocks(&self) -> &[Block];
    fn title(&self) -> Option<String> {
        None
    }
}

impl BlockTree for DraftDocument {
    fn blocks(&self) -> &[Block] {
        &self.blocks
    }
    fn title(&self) -> Option<String> {
        self.title.as_ref().map(|title| plain_text(title))
    }
}

impl BlockTree for Document {
    fn blocks(&self) -> &[Block] {
        &self.blocks
    }
    fn title(&self) -> Option<String> {
        self.title_text()
    }
}

impl BlockTree for Resolved {
    fn blocks(&self) -> &[Block] {
        &self.document.blocks
    }
    fn title(&self) -> Option<String> {
        self.document.title_text()
    }
}

/// Create an assertion builder for a document
pub fn assert_doc<T: BlockTree + ?Sized>(doc: &T) -> DocumentAssertion<'_> {
    DocumentAssertion {
        blocks: doc.blocks(),
        title: doc.title(),
    }
}

/// Create an assertion builder for a bare block sequence
pub fn assert_blocks(blocks: &[Block]) -> DocumentAssertion<'_> {
    DocumentAssertion {
        blocks,
        title: None,
    }
}

fn summarize(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::node_type)
        .collect::<Vec<_>>()
        .join(", ")
}

fn child<'a, F, R>(blocks: &'a [Block], index: usize, context: &str, assertion: F)
where
    F: FnOnce(BlockAssertion<'a>) -> R,
{
    assert!(
        index < blocks.len(),
        "{}: Block index {} out of bounds ({} blocks: [{}])",
        context,
        index,
        blocks.len(),
        summarize(blocks)
    );
    assertion(BlockAssertion {
        block: &blocks[index],
        context: format!("{}[{}]", context, index),
    });
}

fn count(blocks: &[Block], expected: usize, context: &str) {
    assert_eq!(
        blocks.len(),
        expected,
        "{}: Expected {} blocks, found {} blocks: [{}]",
        context,
        expected,
        blocks.len(),
        summarize(blocks)
    );
}

// ============================================================================
// Document Assertions
// ============================================================================

pub struct DocumentAssertion<'a> {
    blocks: &'a [Block],
    title: Option<String>,
}

impl<'a> DocumentAssertion<'a> {
    pub fn block_count(self, expected: usize) -> Self {
        count(self.blocks, expected, "blocks");
        self
    }

    /// Assert on a specific block by index
    pub fn block<F, R>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(BlockAssertion<'a>) -> R,
    {
        child(self.blocks, index, "blocks", assertion);
        self
    }

    pub fn title(self, expected: &str) -> Self {
        assert_eq!(
            self.title.as_deref(),
            Some(expected),
            "Expected document title '{}'",
            expected
        );
        self
    }

    pub fn untitled(self) -> Self {
        assert!(
            self.title.is_none(),
            "Expected no document title, found {:?}",
            self.title
        );
        self
    }
}

// ============================================================================
// Block Assertions
// ============================================================================

pub struct BlockAssertion<'a> {
    block: &'a Block,
    context: String,
}

impl<'a> BlockAssertion<'a> {
    pub fn assert_paragraph(self) -> ParagraphAssertion<'a> {
        match self.block {
            Block::Paragraph(paragraph) => ParagraphAssertion {
                paragraph,
                context: self.context,
            },
            other => panic!(
                "{}: Expected Paragraph, found {}",
                self.context,
                other.node_type()
            ),
        }
    }

    pub fn assert_list(self) -> ListAssertion<'a> {
        match self.block {
            Block::List(list) => ListAssertion {
                list,
                context: self.context,
            },
            other => panic!(
                "{}: Expected List, found {}",
                self.context,
                other.node_type()
            ),
        }
    }

    pub fn assert_section(self) -> SectionAssertion<'a> {
        match self.block {
            Block::Section(section) => SectionAssertion {
                section,
                context: self.context,
            },
            other => panic!(
                "{}: Expected Section, found {}",
                self.context,
                other.node_type()
            ),
        }
    }

    pub fn assert_delimited(self) -> DelimitedAssertion<'a> {
        match self.block {
            Block::Delimited(delimited) => DelimitedAssertion {
                delimited,
                context: self.context,
            },
            other => panic!(
                "{}: Expected DelimitedBlock, found {}",
                self.context,
                other.node_type()
            ),
        }
    }

    pub fn assert_image(self) -> ImageAssertion<'a> {
        match self.block {
            Block::Image(image) => ImageAssertion {
                image,
                context: self.context,
            },
            other => panic!(
                "{}: Expected BlockImage, found {}",
                self.context,
                other.node_type()
            ),
        }
    }

    pub fn assert_table(self) -> TableAssertion<'a> {
        match self.block {
            Block::Table(table) => TableAssertion {
                table,
                context: self.context,
            },
            other => panic!(
                "{}: Expected Table, found {}",
                self.context,
                other.node_type()
            ),
        }
    }

    pub fn node_type(self, expected: &str) -> Self {
        assert_eq!(
            self.block.node_type(),
            expected,
            "{}: Expected node type",
            self.context
        );
        self
    }

    pub fn id(self, expected: &str) -> Self {
        assert_eq!(self.block.id(), Some(expected), "{}: Expected id", self.context);
        self
    }

    pub fn block_title(self, expected: &str) -> Self {
        assert_eq!(
            self.block.title(),
            Some(expected),
            "{}: Expected block title",
            self.context
        );
        self
    }

    pub fn attribute(self, key: &str, expected: &str) -> Self {
        let actual = self.block.attributes().and_then(|attributes| attributes.get(key));
        assert_eq!(
            actual,
            Some(expected),
            "{}: Expected attribute '{}'",
            self.context,
            key
        );
        self
    }
}

// ============================================================================
// Paragraph Assertions
// ============================================================================

pub struct ParagraphAssertion<'a> {
    paragraph: &'a Paragraph,
    context: String,
}

impl ParagraphAssertion<'_> {
    pub fn text(self, expected: &str) -> Self {
        TextMatch::Exact(expected.to_string()).assert(&self.paragraph.text(), &self.context);
        self
    }
    pub fn text_starts_with(self, prefix: &str) -> Self {
        TextMatch::StartsWith(prefix.to_string()).assert(&self.paragraph.text(), &self.context);
        self
    }
    pub fn text_contains(self, substring: &str) -> Self {
        TextMatch::Contains(substring.to_string()).assert(&self.paragraph.text(), &self.context);
        self
    }
    pub fn line_count(self, expected: usize) -> Self {
        let actual = self.paragraph.lines.len();
        assert_eq!(
            actual, expected,
            "{}: Expected {} lines, found {} lines",
            self.context, expected, actual
        );
        self
    }
    /// Assert the inline nodes of one line
    pub fn line(self, index: usize, expected: &[Inline]) -> Self {
        let actual = self.paragraph.lines.get(index);
        assert_eq!(
            actual.map(Vec::as_slice),
            Some(expected),
            "{}: line {}",
            self.context,
            index
        );
        self
    }
}

// ============================================================================
// List Assertions
// ============================================================================

pub struct ListAssertion<'a> {
    list: &'a List,
    context: String,
}

impl<'a> ListAssertion<'a> {
    pub fn item_count(self, expected: usize) -> Self {
        let actual = self.list.items.len();
        assert_eq!(
            actual, expected,
            "{}: Expected {} list items, found {} list items",
            self.context, expected, actual
        );
        self
    }

    pub fn item<F, R>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ListItemAssertion<'a>) -> R,
    {
        assert!(
            index < self.list.items.len(),
            "{}: Item index {} out of bounds (list has {} items)",
            self.context,
            index,
            self.list.items.len()
        );
        assertion(ListItemAssertion {
            item: &self.list.items[index],
            context: format!("{}:items[{}]", self.context, index),
        });
        self
    }

    pub fn ordered(self, expected: bool) -> Self {
        assert_eq!(
            self.list.is_ordered(),
            expected,
            "{}: Expected ordered = {}",
            self.context,
            expected
        );
        self
    }

    pub fn attribute(self, key: &str, expected: &str) -> Self {
        assert_eq!(
            self.list.attributes.get(key),
            Some(expected),
            "{}: Expected list attribute '{}'",
            self.context,
            key
        );
        self
    }

    pub fn has_option(self, option: &str) -> Self {
        assert!(
            self.list.attributes.has_option(option),
            "{}: Expected option '{}' on list",
            self.context,
            option
        );
        self
    }
}

pub struct ListItemAssertion<'a> {
    item: &'a ListItem,
    context: String,
}

impl<'a> ListItemAssertion<'a> {
    /// Text of the item's leading paragraph
    fn lead_text(&self) -> String {
        match self.item.elements.first() {
            Some(Block::Paragraph(paragraph)) => paragraph.text(),
            _ => String::new(),
        }
    }

    pub fn text(self, expected: &str) -> Self {
        TextMatch::Exact(expected.to_string()).assert(&self.lead_text(), &self.context);
        self
    }
    pub fn text_starts_with(self, prefix: &str) -> Self {
        TextMatch::StartsWith(prefix.to_string()).assert(&self.lead_text(), &self.context);
        self
    }
    pub fn level(self, expected: usize) -> Self {
        assert_eq!(
            self.item.level, expected,
            "{}: Expected level {}, found {}",
            self.context, expected, self.item.level
        );
        self
    }
    pub fn bullet(self, expected: BulletStyle) -> Self {
        assert_eq!(
            self.item.bullet_style, expected,
            "{}: Expected bullet style {}, found {}",
            self.context, expected, self.item.bullet_style
        );
        self
    }
    pub fn check(self, expected: CheckStyle) -> Self {
        assert_eq!(
            self.item.check_style, expected,
            "{}: Expected check style",
            self.context
        );
        self
    }
    pub fn attribute(self, key: &str, expected: &str) -> Self {
        assert_eq!(
            self.item.attributes.get(key),
            Some(expected),
            "{}: Expected item attribute '{}'",
            self.context,
            key
        );
        self
    }
    pub fn child_count(self, expected: usize) -> Self {
        count(
            &self.item.elements,
            expected,
            &format!("{}:elements", self.context),
        );
        self
    }
    pub fn child<F, R>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(BlockAssertion<'a>) -> R,
    {
        let context = format!("{}:elements", self.context);
        child(&self.item.elements, index, &context, assertion);
        self
    }
    /// Assert on the first list nested in this item
    pub fn sublist<F, R>(self, assertion: F) -> Self
    where
        F: FnOnce(ListAssertion<'a>) -> R,
    {
        let list = self
            .item
            .elements
            .iter()
            .find_map(|block| match block {
                Block::List(list) => Some(list),
                _ => None,
            })
            .unwrap_or_else(|| {
                panic!(
                    "{}: Expected a nested list, found [{}]",
                    self.context,
                    summarize(&self.item.elements)
                )
            });
        assertion(ListAssertion {
            list,
            context: format!("{}:sublist", self.context),
        });
        self
    }
    pub fn no_sublist(self) -> Self {
        assert!(
            self.item.sublists().next().is_none(),
            "{}: Expected no nested list",
            self.context
        );
        self
    }
}

// ============================================================================
// Section Assertions
// ============================================================================

pub struct SectionAssertion<'a> {
    section: &'a Section,
    context: String,
}

impl<'a> SectionAssertion<'a> {
    pub fn title(self, expected: &str) -> Self {
        TextMatch::Exact(expected.to_string()).assert(&self.section.title_text(), &self.context);
        self
    }
    pub fn level(self, expected: usize) -> Self {
        assert_eq!(
            self.section.level, expected,
            "{}: Expected section level",
            self.context
        );
        self
    }
    pub fn id(self, expected: &str) -> Self {
        assert_eq!(
            self.section.id(),
            Some(expected),
            "{}: Expected section id",
            self.context
        );
        self
    }
    pub fn child_count(self, expected: usize) -> Self {
        count(
            &self.section.blocks,
            expected,
            &format!("{}:blocks", self.context),
        );
        self
    }
    pub fn child<F, R>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(BlockAssertion<'a>) -> R,
    {
        let context = format!("{}:blocks", self.context);
        child(&self.section.blocks, index, &context, assertion);
        self
    }
}

// ============================================================================
// Delimited Block Assertions
// ============================================================================

pub struct DelimitedAssertion<'a> {
    delimited: &'a DelimitedBlock,
    context: String,
}

impl<'a> DelimitedAssertion<'a> {
    pub fn kind(self, expected: DelimitedKind) -> Self {
        assert_eq!(
            self.delimited.kind, expected,
            "{}: Expected {} block, found {}",
            self.context, expected, self.delimited.kind
        );
        self
    }
    /// Assert the raw lines of a verbatim block
    pub fn lines(self, expected: &[&str]) -> Self {
        let lines = self.delimited.lines().unwrap_or_else(|| {
            panic!(
                "{}: Expected verbatim content in {} block",
                self.context, self.delimited.kind
            )
        });
        assert_eq!(lines, expected, "{}: Expected lines", self.context);
        self
    }
    pub fn child_count(self, expected: usize) -> Self {
        let blocks = self.delimited.blocks().unwrap_or_default();
        count(blocks, expected, &format!("{}:blocks", self.context));
        self
    }
    pub fn child<F, R>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(BlockAssertion<'a>) -> R,
    {
        let blocks = self.delimited.blocks().unwrap_or_default();
        let context = format!("{}:blocks", self.context);
        child(blocks, index, &context, assertion);
        self
    }
}

// ============================================================================
// Image Assertions
// ============================================================================

pub struct ImageAssertion<'a> {
    image: &'a BlockImage,
    context: String,
}

impl ImageAssertion<'_> {
    pub fn path(self, expected: &str) -> Self {
        assert_eq!(self.image.image.path, expected, "{}: Expected path", self.context);
        self
    }
    pub fn alt(self, expected: &str) -> Self {
        assert_eq!(self.image.image.alt, expected, "{}: Expected alt", self.context);
        self
    }
    pub fn size(self, width: Option<&str>, height: Option<&str>) -> Self {
        assert_eq!(
            (self.image.image.width.as_deref(), self.image.image.height.as_deref()),
            (width, height),
            "{}: Expected width and height",
            self.context
        );
        self
    }
    pub fn attribute(self, key: &str, expected: &str) -> Self {
        let actual = self
            .image
            .attributes
            .get(key)
            .or_else(|| self.image.image.attributes.get(key));
        assert_eq!(
            actual,
            Some(expected),
            "{}: Expected image attribute '{}'",
            self.context,
            key
        );
        self
    }
}

// ============================================================================
// Table Assertions
// ============================================================================

pub struct TableAssertion<'a> {
    table: &'a Table,
    context: String,
}

impl TableAssertion<'_> {
    pub fn columns(self, expected: usize) -> Self {
        assert_eq!(self.table.columns, expected, "{}: Expected columns", self.context);
        self
    }
    pub fn row_count(self, expected: usize) -> Self {
        assert_eq!(
            self.table.rows.len(),
            expected,
            "{}: Expected body rows",
            self.context
        );
        self
    }
    pub fn header(self, expected: &[&str]) -> Self {
        let header = self
            .table
            .header
            .as_ref()
            .unwrap_or_else(|| panic!("{}: Expected a header row", self.context));
        let cells: Vec<String> = header.cells.iter().map(|cell| plain_text(cell)).collect();
        assert_eq!(cells, expected, "{}: Expected header cells", self.context);
        self
    }
    pub fn no_header(self) -> Self {
        assert!(
            self.table.header.is_none(),
            "{}: Expected no header row",
            self.context
        );
        self
    }
    pub fn row(self, index: usize, expected: &[&str]) -> Self {
        let row = self.table.rows.get(index).unwrap_or_else(|| {
            panic!(
                "{}: Row index {} out of bounds ({} rows)",
                self.context,
                index,
                self.table.rows.len()
            )
        });
        let cells: Vec<String> = row.cells.iter().map(|cell| plain_text(cell)).collect();
        assert_eq!(cells, expected, "{}: Expected row {}", self.context, index);
        self
    }
}
