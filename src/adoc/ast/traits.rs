//! AST traversal
//!
//! [`Visitor`] walks the tree read-only in document order; default methods are empty so
//! implementors override only what they need. The mutable helpers cover the few
//! whole-tree rewrites the resolution stages and tests share.

use super::elements::{Block, BlockContent, ListItem};
use super::inlines::{Inline, InlineContent};
use super::range::Range;

pub trait Visitor<'a> {
    fn visit_block(&mut self, _block: &'a Block) {}
    fn leave_block(&mut self, _block: &'a Block) {}

    fn visit_list_item(&mut self, _item: &'a ListItem) {}
    fn leave_list_item(&mut self, _item: &'a ListItem) {}

    /// Called for every inline node, nested ones included.
    fn visit_inline(&mut self, _inline: &'a Inline) {}
}

pub fn walk_blocks<'a>(visitor: &mut dyn Visitor<'a>, blocks: &'a [Block]) {
    for block in blocks {
        walk_block(visitor, block);
    }
}

pub fn walk_block<'a>(visitor: &mut dyn Visitor<'a>, block: &'a Block) {
    visitor.visit_block(block);
    match block {
        Block::Paragraph(paragraph) => {
            for line in &paragraph.lines {
                walk_inlines(visitor, line);
            }
        }
        Block::Section(section) => {
            walk_inlines(visitor, &section.title);
            walk_blocks(visitor, &section.blocks);
        }
        Block::List(list) => {
            for item in &list.items {
                visitor.visit_list_item(item);
                walk_blocks(visitor, &item.elements);
                visitor.leave_list_item(item);
            }
        }
        Block::Delimited(delimited) => {
            if let BlockContent::Blocks(blocks) = &delimited.content {
                walk_blocks(visitor, blocks);
            }
        }
        Block::Table(table) => {
            for row in table.header.iter().chain(table.rows.iter()) {
                for cell in &row.cells {
                    walk_inlines(visitor, cell);
                }
            }
        }
        Block::Image(_)
        | Block::Include(_)
        | Block::IncludeError(_)
        | Block::TocMacro(_)
        | Block::TableOfContents(_)
        | Block::AttributeDeclaration(_)
        | Block::ThematicBreak { .. } => {}
    }
    visitor.leave_block(block);
}

pub fn walk_inlines<'a>(visitor: &mut dyn Visitor<'a>, inlines: &'a [Inline]) {
    for inline in inlines {
        visitor.visit_inline(inline);
        if let Some(children) = inline.children() {
            walk_inlines(visitor, children);
        }
    }
}

/// Apply `f` to every inline node in the tree in document order, together with the range
/// of the block holding it. A node is visited before the nodes nested in it, and those
/// before its next sibling. Verbatim content is not inline content and is skipped.
pub fn for_each_inline_mut(blocks: &mut [Block], f: &mut dyn FnMut(&mut Inline, &Range)) {
    for block in blocks {
        let range = block.range().clone();
        match block {
            Block::Paragraph(paragraph) => {
                for line in &mut paragraph.lines {
                    visit_inlines_mut(line, &range, f);
                }
            }
            Block::Section(section) => {
                visit_inlines_mut(&mut section.title, &range, f);
                for_each_inline_mut(&mut section.blocks, f);
            }
            Block::List(list) => {
                for item in &mut list.items {
                    for_each_inline_mut(&mut item.elements, f);
                }
            }
            Block::Delimited(delimited) => {
                if let BlockContent::Blocks(blocks) = &mut delimited.content {
                    for_each_inline_mut(blocks, f);
                }
            }
            Block::Table(table) => {
                for cell in table.cells_mut() {
                    visit_inlines_mut(cell, &range, f);
                }
            }
            _ => {}
        }
    }
}

/// Apply `f` to every node of `content` depth-first, in document order.
pub fn visit_inlines_mut(
    content: &mut InlineContent,
    range: &Range,
    f: &mut dyn FnMut(&mut Inline, &Range),
) {
    for inline in content.iter_mut() {
        f(inline, range);
        if let Some(children) = inline.children_mut() {
            visit_inlines_mut(children, range, f);
        }
    }
}

/// Reset every source range in the tree. Used to compare trees parsed from different
/// sources for structural equality.
pub fn clear_locations(blocks: &mut [Block]) {
    for block in blocks {
        *block.range_mut() = Range::default();
        match block {
            Block::List(list) => {
                for item in &mut list.items {
                    item.location = Range::default();
                    clear_locations(&mut item.elements);
                }
            }
            other => {
                if let Some(children) = other.child_blocks_mut() {
                    clear_locations(children);
                }
            }
        }
    }
}
