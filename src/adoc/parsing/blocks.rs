//! Block parser
//!
//!     A recursive-descent parser over classified lines. [`BlockParser::parse_blocks`]
//!     reads the metadata lines in front of a block, looks at the kind of the next line and
//!     hands off to the builder for that kind. Each builder consumes exactly the lines of
//!     its block and leaves the cursor on the first line after it.
//!
//!     The same parser runs in three contexts:
//!
//!         - Document: the top level of a document or of an included file.
//!         - Delimited: the inside of a compound fence (example, sidebar, quote, open).
//!           Headings are text here.
//!         - ListItem: one block attached to a list item with `+`. Paragraphs also end at
//!           a `+` line, and list markers end the block instead of starting a list.
//!
//!     Ambiguous input never fails; whatever doesn't fit a block form becomes paragraph
//!     text.

use super::attribute_list::macro_attributes;
use super::metadata::{collect_metadata, Metadata};
use crate::adoc::ast::attributes::{ElementAttributes, ATTR_CUSTOM_ID, ATTR_ID, ATTR_ROLE, ATTR_TITLE};
use crate::adoc::ast::diagnostics::Diagnostic;
use crate::adoc::ast::elements::{
    AttributeDeclaration, Block, BlockImage, DelimitedBlock, DelimitedKind, IncludeMacro,
    Paragraph, Section, TocMacro,
};
use crate::adoc::ast::inlines::InlineContent;
use crate::adoc::inlines::{image_macro, parse_inline_text, parse_line};
use crate::adoc::lexing::{lines_range, LineCursor, LineKind, SourceLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Document,
    Delimited,
    ListItem,
}

pub struct BlockParser<'a> {
    pub(super) cursor: LineCursor<'a>,
    pub(super) context: Context,
    /// Level 0 headings become sections instead of the document title.
    fragment: bool,
    title: Option<InlineContent>,
    pub(super) warnings: Vec<Diagnostic>,
}

impl<'a> BlockParser<'a> {
    pub fn new(lines: &'a [SourceLine], context: Context) -> Self {
        Self {
            cursor: LineCursor::new(lines),
            context,
            fragment: false,
            title: None,
            warnings: Vec::new(),
        }
    }

    /// Parser for an included file: every heading is a section.
    pub fn fragment(lines: &'a [SourceLine]) -> Self {
        Self {
            fragment: true,
            ..Self::new(lines, Context::Document)
        }
    }

    /// Parse every remaining line. Headings come back as empty sections in the flat
    /// sequence; see [`nest`](super::sections::nest).
    pub fn parse_blocks(&mut self) -> Vec<Block> {
        let mut blocks = Vec::new();
        while !self.cursor.is_at_end() {
            let metadata = collect_metadata(&mut self.cursor);
            if self.cursor.peek_kind().is_some_and(LineKind::is_blank) {
                self.cursor.advance();
                continue;
            }
            let seen_content = blocks
                .iter()
                .any(|b| !matches!(b, Block::AttributeDeclaration(_)));
            if let Some(block) = self.parse_block(metadata, seen_content) {
                blocks.push(block);
            }
        }
        blocks
    }

    /// Document title and parse warnings.
    pub fn finish(self) -> (Option<InlineContent>, Vec<Diagnostic>) {
        (self.title, self.warnings)
    }

    /// Build the block starting at the cursor. Returns `None` when the lines consumed
    /// produce no node (comments, the document title, dangling metadata), and in list item
    /// context when the next line belongs to the list rather than to the attached block.
    pub(super) fn parse_block(&mut self, metadata: Metadata, seen_content: bool) -> Option<Block> {
        let line = self.cursor.peek()?;
        match &line.kind {
            LineKind::Blank => None,
            LineKind::Comment => {
                self.cursor.advance();
                None
            }
            LineKind::Heading { level, title } => {
                self.parse_heading(metadata, *level, title, seen_content)
            }
            LineKind::Fence { delimiter, kind } => self.parse_delimited(metadata, delimiter, *kind),
            LineKind::BlockMacro {
                name,
                target,
                attributes,
            } => self.parse_block_macro(metadata, name, target, attributes),
            LineKind::ListMarker { .. } if self.context == Context::ListItem => None,
            LineKind::ListMarker { .. } => Some(self.parse_list(metadata)),
            LineKind::ListContinuation if self.context == Context::ListItem => None,
            LineKind::AttributeEntry { name, value } => {
                self.cursor.advance();
                Some(Block::AttributeDeclaration(AttributeDeclaration {
                    name: name.clone(),
                    value: value.clone(),
                    location: line.range(),
                }))
            }
            LineKind::ThematicBreak => {
                self.cursor.advance();
                Some(Block::ThematicBreak {
                    location: line.range(),
                })
            }
            LineKind::Text
                if self.context != Context::ListItem && line.text.starts_with([' ', '\t']) =>
            {
                Some(self.parse_literal_paragraph(metadata))
            }
            kind if kind.is_metadata() => {
                self.cursor.advance();
                None
            }
            _ => self.parse_paragraph(metadata),
        }
    }

    fn parse_heading(
        &mut self,
        metadata: Metadata,
        level: usize,
        title: &str,
        seen_content: bool,
    ) -> Option<Block> {
        if self.context != Context::Document {
            return self.parse_paragraph(metadata);
        }
        if level == 0 && !self.fragment {
            if self.title.is_some() || seen_content {
                return self.parse_paragraph(metadata);
            }
            self.cursor.advance();
            self.title = Some(parse_inline_text(title));
            return None;
        }
        let line = self.cursor.advance()?;
        let mut section = Section::new(level, parse_inline_text(title)).at(line.range());
        section.attributes = metadata.into_attributes();
        Some(Block::Section(section))
    }

    fn parse_block_macro(
        &mut self,
        metadata: Metadata,
        name: &str,
        target: &str,
        attributes: &str,
    ) -> Option<Block> {
        let location = match name {
            "image" if !target.is_empty() => self.cursor.advance()?.range(),
            "include" | "toc" => self.cursor.advance()?.range(),
            _ => return self.parse_paragraph(metadata),
        };
        let mut block_attributes = metadata.into_attributes();
        let block = match name {
            "image" => {
                let mut image = image_macro(target, attributes);
                lift_block_attributes(&mut image.attributes, &mut block_attributes);
                let mut block = BlockImage::new(image).at(location);
                block.attributes = block_attributes;
                Block::Image(block)
            }
            "include" => {
                block_attributes.merge(macro_attributes(attributes, &[]));
                Block::Include(IncludeMacro {
                    target: target.to_string(),
                    attributes: block_attributes,
                    location,
                })
            }
            _ => {
                block_attributes.merge(macro_attributes(attributes, &[]));
                Block::TocMacro(TocMacro {
                    attributes: block_attributes,
                    location,
                })
            }
        };
        Some(block)
    }

    fn parse_paragraph(&mut self, metadata: Metadata) -> Option<Block> {
        let start = self.cursor.position();
        let mut lines: Vec<&SourceLine> = Vec::new();
        while let Some(line) = self.cursor.peek() {
            if self.cursor.position() > start && self.ends_paragraph(&line.kind) {
                break;
            }
            self.cursor.advance();
            if line.kind != LineKind::Comment {
                lines.push(line);
            }
        }
        if lines.is_empty() {
            return None;
        }
        let location = lines_range(self.cursor.consumed_since(start));
        let attributes = metadata.into_attributes();

        let verbatim = match attributes.style() {
            Some("literal") => Some(DelimitedKind::Literal),
            Some("listing") | Some("source") => Some(DelimitedKind::Listing),
            Some("pass") => Some(DelimitedKind::Passthrough),
            _ => None,
        };
        if let Some(kind) = verbatim {
            let raw = lines.iter().map(|line| line.text.clone()).collect();
            let mut block = DelimitedBlock::verbatim(kind, raw).at(location);
            block.attributes = attributes;
            return Some(Block::Delimited(block));
        }

        let mut paragraph =
            Paragraph::new(lines.iter().map(|line| parse_line(&line.text)).collect()).at(location);
        paragraph.attributes = attributes;
        Some(Block::Paragraph(paragraph))
    }

    fn ends_paragraph(&self, kind: &LineKind) -> bool {
        match kind {
            LineKind::Blank | LineKind::Fence { .. } | LineKind::ListMarker { .. } => true,
            LineKind::ListContinuation => self.context == Context::ListItem,
            _ => false,
        }
    }

    /// Indented lines outside of lists: a literal block, dedented.
    fn parse_literal_paragraph(&mut self, metadata: Metadata) -> Block {
        let start = self.cursor.position();
        while self
            .cursor
            .peek_kind()
            .is_some_and(|kind| !kind.is_blank())
        {
            self.cursor.advance();
        }
        let consumed = self.cursor.consumed_since(start);
        let indent = consumed
            .iter()
            .map(|line| line.text.len() - line.text.trim_start().len())
            .min()
            .unwrap_or(0);
        let raw = consumed
            .iter()
            .map(|line| line.text.get(indent..).unwrap_or("").trim_end().to_string())
            .collect();
        let mut block = DelimitedBlock::verbatim(DelimitedKind::Literal, raw).at(lines_range(consumed));
        block.attributes = metadata.into_attributes();
        Block::Delimited(block)
    }

    pub(super) fn warn(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(code = diagnostic.code(), "{}", diagnostic);
        self.warnings.push(diagnostic);
    }
}

/// Move the block-level keys (id, title, roles) written inside a block macro's brackets
/// onto the block itself.
fn lift_block_attributes(from: &mut ElementAttributes, to: &mut ElementAttributes) {
    for key in [ATTR_ID, ATTR_CUSTOM_ID, ATTR_TITLE] {
        if let Some(value) = from.remove(key) {
            to.set(key, value);
        }
    }
    if let Some(roles) = from.remove(ATTR_ROLE) {
        for role in roles.split_whitespace() {
            to.add_role(role);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::ast::inlines::Inline;
    use crate::adoc::lexing::source_lines;

    fn parse(source: &str) -> (Vec<Block>, Option<InlineContent>) {
        let lines = source_lines(source);
        let mut parser = BlockParser::new(&lines, Context::Document);
        let blocks = parser.parse_blocks();
        let (title, _) = parser.finish();
        (blocks, title)
    }

    #[test]
    fn test_paragraph_lines_keep_inline_structure() {
        let (blocks, _) = parse("first *line*\nsecond line\n");
        match &blocks[..] {
            [Block::Paragraph(p)] => {
                assert_eq!(p.lines.len(), 2);
                assert!(matches!(p.lines[0][1], Inline::Quoted(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_document_title_only_first() {
        let (blocks, title) = parse(":author: me\n= Title\n\n= Not a title\n");
        assert_eq!(title, Some(vec![Inline::text("Title")]));
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[1], Block::Paragraph(_)));
    }

    #[test]
    fn test_headings_are_flat_sections() {
        let (blocks, _) = parse("== One\ntext\n\n=== Two\n");
        let levels: Vec<_> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Section(s) => Some(s.level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![1, 2]);
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn test_block_macro_inside_paragraph_is_text() {
        let (blocks, _) = parse("some text\nimage::foo.png[]\n");
        match &blocks[..] {
            [Block::Paragraph(p)] => assert_eq!(p.lines[1], vec![Inline::text("image::foo.png[]")]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_block_macro_is_text() {
        let (blocks, _) = parse("video::intro.mp4[]\n");
        assert!(matches!(blocks[..], [Block::Paragraph(_)]));
    }

    #[test]
    fn test_literal_paragraph() {
        let (blocks, _) = parse("  indented\n    more\n\nnext\n");
        match &blocks[0] {
            Block::Delimited(d) => {
                assert_eq!(d.kind, DelimitedKind::Literal);
                assert_eq!(d.lines(), Some(&["indented".to_string(), "  more".to_string()][..]));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(blocks[1], Block::Paragraph(_)));
    }

    #[test]
    fn test_styled_paragraph_becomes_verbatim() {
        let (blocks, _) = parse("[source,rust]\nfn main() {}\n");
        match &blocks[..] {
            [Block::Delimited(d)] => {
                assert_eq!(d.kind, DelimitedKind::Listing);
                assert_eq!(d.attributes.get("language"), Some("rust"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_attribute_entries_and_breaks() {
        let (blocks, _) = parse(":version: 1.0\n\n'''\n\n:version!:\n");
        assert!(matches!(&blocks[0], Block::AttributeDeclaration(d) if d.value.as_deref() == Some("1.0")));
        assert!(matches!(blocks[1], Block::ThematicBreak { .. }));
        assert!(matches!(&blocks[2], Block::AttributeDeclaration(d) if d.value.is_none()));
    }

    #[test]
    fn test_comments_are_dropped() {
        let (blocks, _) = parse("// hidden\ntext\n// also hidden\nmore\n");
        match &blocks[..] {
            [Block::Paragraph(p)] => assert_eq!(p.lines.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lone_continuation_outside_list_is_text() {
        let (blocks, _) = parse("+\n");
        match &blocks[..] {
            [Block::Paragraph(p)] => assert_eq!(p.text(), "+"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_include_and_toc_macros() {
        let (blocks, _) = parse("toc::[]\n\ninclude::chapter.adoc[leveloffset=+1]\n");
        assert!(matches!(blocks[0], Block::TocMacro(_)));
        match &blocks[1] {
            Block::Include(include) => {
                assert_eq!(include.target, "chapter.adoc");
                assert_eq!(include.attributes.get("leveloffset"), Some("+1"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
