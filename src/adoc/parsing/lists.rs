//! List parsing
//!
//!     Nesting is decided by bullet style, not by indentation. The parser keeps a stack of
//!     open lists, one slot per style, deepest last:
//!
//!         - a marker with the style of the top slot adds a sibling item;
//!         - a style already lower in the stack closes everything above that slot and
//!           continues its list;
//!         - an unseen style opens a new list inside the last item of the top list.
//!
//!     Closing a slot moves its list into the last item of the slot below, so the stack
//!     always holds the chain of "current" items from the root down.
//!
//!     Blank lines and `+`:
//!
//!         * a             One blank line before a marker is swallowed.
//!                         Two end the list: the next marker starts a new one.
//!         * b
//!         +               `+` attaches the next block to the deepest current item.
//!         ----            Each blank line in front of the `+` moves the attachment
//!         attached        one level up, never above level 1.
//!         ----
//!
//!     A block following an item without `+` is not part of the list and ends it.

use super::blocks::{BlockParser, Context};
use super::metadata::{collect_metadata, Metadata};
use crate::adoc::ast::attributes::ElementAttributes;
use crate::adoc::ast::diagnostics::{Diagnostic, DiagnosticKind};
use crate::adoc::ast::elements::{
    Block, BulletStyle, CheckStyle, List, ListItem, Paragraph, MAX_LIST_DEPTH,
};
use crate::adoc::ast::range::Range;
use crate::adoc::inlines::parse_line;
use crate::adoc::lexing::{lines_range, LineKind};

/// One slot of the open-list stack.
struct OpenList {
    style: BulletStyle,
    list: List,
}

impl OpenList {
    fn new(style: BulletStyle, attributes: ElementAttributes) -> Self {
        let mut list = List::new(Vec::new());
        list.attributes = attributes;
        Self { style, list }
    }

    fn finish(mut self) -> List {
        if let Some(range) = Range::bounding_box(self.list.items.iter().map(|item| &item.location)) {
            self.list.location = range;
        }
        self.list
    }
}

/// Close slots until `depth` remain, moving each closed list into its parent item.
fn fold_to(stack: &mut Vec<OpenList>, depth: usize) {
    while stack.len() > depth.max(1) {
        let Some(done) = stack.pop() else { break };
        let list = done.finish();
        if let Some(parent) = stack.last_mut().and_then(|open| open.list.items.last_mut()) {
            parent.elements.push(Block::List(list));
        }
    }
}

impl<'a> BlockParser<'a> {
    /// Parse a list starting at the marker under the cursor.
    pub(super) fn parse_list(&mut self, metadata: Metadata) -> Block {
        let start = self.cursor.position();
        let mut end = start;
        let mut stack: Vec<OpenList> = Vec::new();
        let mut pending = Some(metadata.into_attributes());

        while let Some(line) = self.cursor.peek() {
            match &line.kind {
                LineKind::ListMarker { .. } => {
                    self.parse_list_item(&mut stack, pending.take().unwrap_or_default());
                    end = self.cursor.position();
                }
                LineKind::ListContinuation => {
                    self.cursor.advance();
                    let depth = stack.len();
                    self.attach(&mut stack, depth);
                    end = self.cursor.position();
                }
                LineKind::Comment => {
                    self.cursor.advance();
                }
                LineKind::Blank => {
                    let blanks_start = self.cursor.position();
                    let after = self
                        .cursor
                        .find(|line| !line.kind.is_blank())
                        .unwrap_or(blanks_start);
                    let blanks = after.saturating_sub(blanks_start);
                    let next = self.cursor.slice(after, after + 1).first().map(|l| &l.kind);
                    match next {
                        Some(LineKind::ListContinuation) => {
                            self.cursor.reset_to(after + 1);
                            let depth = stack.len().saturating_sub(blanks);
                            self.attach(&mut stack, depth);
                            end = self.cursor.position();
                        }
                        Some(LineKind::ListMarker { .. }) if blanks == 1 => {
                            self.cursor.reset_to(after);
                        }
                        Some(kind)
                            if blanks == 1 && kind.is_metadata() && self.metadata_precedes_marker(after) =>
                        {
                            self.cursor.reset_to(after);
                        }
                        _ => break,
                    }
                }
                kind if kind.is_metadata() && self.metadata_precedes_marker(self.cursor.position()) => {
                    pending = Some(collect_metadata(&mut self.cursor).into_attributes());
                }
                _ => break,
            }
        }

        fold_to(&mut stack, 1);
        let mut list = match stack.pop() {
            Some(open) => open.finish(),
            None => List::new(Vec::new()),
        };
        list.location = lines_range(self.cursor.slice(start, end));
        Block::List(list)
    }

    /// Metadata lines at `position` directly followed by a list marker.
    fn metadata_precedes_marker(&self, position: usize) -> bool {
        let rest = self.cursor.slice(position, usize::MAX);
        rest.iter()
            .find(|line| !line.kind.is_metadata())
            .is_some_and(|line| matches!(line.kind, LineKind::ListMarker { .. }))
    }

    fn parse_list_item(&mut self, stack: &mut Vec<OpenList>, attributes: ElementAttributes) {
        let Some(marker_line) = self.cursor.advance() else {
            return;
        };
        let LineKind::ListMarker {
            style,
            check,
            ordinal,
            overflow,
            content,
        } = &marker_line.kind
        else {
            return;
        };

        // Item text runs on over following plain lines.
        let item_start = self.cursor.position() - 1;
        let mut lines = vec![parse_line(content)];
        while let Some(next) = self.cursor.peek() {
            match next.kind {
                LineKind::Text | LineKind::BlockMacro { .. } | LineKind::Heading { .. } => {
                    lines.push(parse_line(next.text.trim_start()));
                }
                LineKind::Comment => {}
                _ => break,
            }
            self.cursor.advance();
        }
        let location = lines_range(self.cursor.consumed_since(item_start));

        let mut style = *style;
        let mut folded = *overflow;
        let mut opened = false;
        if let Some(slot) = stack.iter().position(|open| open.style == style) {
            fold_to(stack, slot + 1);
        } else if stack.len() >= MAX_LIST_DEPTH {
            folded = true;
            if let Some(top) = stack.last() {
                style = top.style;
            }
        } else {
            stack.push(OpenList::new(style, ElementAttributes::new()));
            opened = true;
        }
        if folded {
            self.warn(Diagnostic::warning(
                marker_line.range(),
                DiagnosticKind::ListDepthExceeded {
                    max: MAX_LIST_DEPTH,
                },
            ));
        }

        let level = stack.len();
        let Some(top) = stack.last_mut() else {
            return;
        };
        let mut item = ListItem::new(level, style)
            .with_check(*check)
            .at(location.clone());
        if opened {
            top.list.attributes.merge(attributes);
        } else {
            item.attributes = attributes;
        }
        if *check != CheckStyle::NoCheck {
            top.list.attributes.set_option("checklist");
        }
        if let (true, BulletStyle::Arabic, Some(n)) = (top.list.items.is_empty(), style, *ordinal) {
            if n != 1 {
                top.list.attributes.set("start", n.to_string());
            }
        }
        item.elements
            .push(Block::Paragraph(Paragraph::new(lines).at(location)));
        top.list.items.push(item);
    }

    /// Attach the block after a `+` to the current item at `depth`.
    fn attach(&mut self, stack: &mut Vec<OpenList>, depth: usize) {
        fold_to(stack, depth);
        let metadata = collect_metadata(&mut self.cursor);
        let outer = self.context;
        self.context = Context::ListItem;
        let block = self.parse_block(metadata, true);
        self.context = outer;
        if let Some(block) = block {
            if let Some(item) = stack.last_mut().and_then(|open| open.list.items.last_mut()) {
                item.elements.push(block);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::ast::elements::DelimitedKind;
    use crate::adoc::lexing::source_lines;

    fn parse(source: &str) -> (Vec<Block>, Vec<Diagnostic>) {
        let lines = source_lines(source);
        let mut parser = BlockParser::new(&lines, Context::Document);
        let blocks = parser.parse_blocks();
        let (_, warnings) = parser.finish();
        (blocks, warnings)
    }

    fn list(block: &Block) -> &List {
        match block {
            Block::List(list) => list,
            other => panic!("expected list, got {}", other.node_type()),
        }
    }

    fn sublist(item: &ListItem) -> &List {
        item.sublists().next().expect("item has no sublist")
    }

    #[test]
    fn test_siblings_and_nesting() {
        let (blocks, _) = parse("* a\n** b\n** c\n* d\n");
        assert_eq!(blocks.len(), 1);
        let top = list(&blocks[0]);
        assert_eq!(top.items.len(), 2);
        let nested = sublist(&top.items[0]);
        assert_eq!(nested.items.len(), 2);
        assert_eq!(nested.items[0].level, 2);
        assert_eq!(nested.items[1].bullet_style, BulletStyle::TwoAsterisks);
    }

    #[test]
    fn test_style_not_count_decides_nesting() {
        let (blocks, _) = parse("- a\n* b\n- c\n");
        let top = list(&blocks[0]);
        assert_eq!(top.items.len(), 2);
        assert_eq!(sublist(&top.items[0]).items[0].bullet_style, BulletStyle::OneAsterisk);
    }

    #[test]
    fn test_one_blank_line_swallowed() {
        let (blocks, _) = parse("* a\n\n* b\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(list(&blocks[0]).items.len(), 2);
    }

    #[test]
    fn test_two_blank_lines_split_lists() {
        let (blocks, _) = parse("* a\n\n\n* b\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(list(&blocks[0]).items.len(), 1);
        assert_eq!(list(&blocks[1]).items.len(), 1);
    }

    #[test]
    fn test_item_text_continues() {
        let (blocks, _) = parse("* first line\n  second line\n* next\n");
        let top = list(&blocks[0]);
        match &top.items[0].elements[0] {
            Block::Paragraph(p) => assert_eq!(p.text(), "first line\nsecond line"),
            other => panic!("unexpected {}", other.node_type()),
        }
    }

    #[test]
    fn test_continuation_attaches_to_current_item() {
        let (blocks, _) = parse("* a\n** b\n+\n----\ncode\n----\n* c\n");
        let top = list(&blocks[0]);
        let nested = sublist(&top.items[0]);
        assert!(matches!(
            &nested.items[0].elements[1],
            Block::Delimited(d) if d.kind == DelimitedKind::Listing
        ));
        assert_eq!(top.items.len(), 2);
    }

    #[test]
    fn test_blank_lines_before_continuation_move_up() {
        let source = "* 1\n** 2\n*** 3\n\n\n+\nattached\n";
        let (blocks, _) = parse(source);
        let top = list(&blocks[0]);
        let elements = &top.items[0].elements;
        assert_eq!(elements.len(), 3);
        assert!(matches!(elements[1], Block::List(_)));
        match &elements[2] {
            Block::Paragraph(p) => assert_eq!(p.text(), "attached"),
            other => panic!("unexpected {}", other.node_type()),
        }
    }

    #[test]
    fn test_attachment_depth_is_clamped() {
        let (blocks, _) = parse("* a\n\n\n\n+\nattached\n");
        let top = list(&blocks[0]);
        assert_eq!(top.items[0].elements.len(), 2);
    }

    #[test]
    fn test_fence_without_continuation_ends_list() {
        let (blocks, _) = parse("* a\n----\ncode\n----\n* b\n");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[1], Block::Delimited(_)));
        assert_eq!(list(&blocks[2]).items.len(), 1);
    }

    #[test]
    fn test_skipped_levels() {
        let (blocks, _) = parse("* item\n*** item\n*** item\n** item\n* item\n");
        assert_eq!(blocks.len(), 1);
        let top = list(&blocks[0]);
        assert_eq!(top.items.len(), 2);
        let nested = sublist(&top.items[0]);
        assert_eq!(nested.items.len(), 2);
        assert_eq!(nested.items[0].level, 2);
        assert_eq!(nested.items[0].bullet_style, BulletStyle::ThreeAsterisks);
        let deeper = sublist(&nested.items[1]);
        assert_eq!(deeper.items[0].level, 3);
        assert_eq!(deeper.items[0].bullet_style, BulletStyle::TwoAsterisks);
    }

    #[test]
    fn test_depth_beyond_maximum_folds() {
        let (blocks, warnings) = parse("* 1\n** 2\n*** 3\n**** 4\n***** 5\n- 6\n");
        assert_eq!(warnings.len(), 1);
        let mut current = list(&blocks[0]);
        for _ in 0..4 {
            current = sublist(&current.items[0]);
        }
        assert_eq!(current.items.len(), 2);
        assert_eq!(current.items[1].level, 5);
        assert_eq!(current.items[1].bullet_style, BulletStyle::FiveAsterisks);
    }

    #[test]
    fn test_checklist_and_start() {
        let (blocks, _) = parse("* [x] done\n* [ ] todo\n");
        let top = list(&blocks[0]);
        assert!(top.attributes.has_option("checklist"));
        assert_eq!(top.items[0].check_style, CheckStyle::Checked);
        assert_eq!(top.items[1].check_style, CheckStyle::Unchecked);

        let (blocks, _) = parse("4. four\n5. five\n");
        assert_eq!(list(&blocks[0]).attributes.get("start"), Some("4"));
    }

    #[test]
    fn test_metadata_before_nested_list() {
        let (blocks, _) = parse("[#top]\n* a\n[.compact]\n** b\n");
        let top = list(&blocks[0]);
        assert_eq!(top.attributes.id(), Some("top"));
        assert_eq!(sublist(&top.items[0]).attributes.roles(), vec!["compact"]);
    }

    #[test]
    fn test_glued_marker_is_paragraph() {
        let (blocks, _) = parse("*an invalid list item\n");
        assert!(matches!(blocks[..], [Block::Paragraph(_)]));
    }
}
