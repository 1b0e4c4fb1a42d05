//! Attribute substitution stage
//!
//!     Walks the tree in document order, applying each `:name: value` declaration as it is
//!     passed and replacing every `{name}` placeholder with the value the attribute has at
//!     that point. A reference to an attribute defined further down does not resolve:
//!
//!         {product} is great.        → "{product} is great." + warning
//!         :product: Widget
//!         {product} is great.        → "Widget is great."
//!
//!     Unresolved references stay in the text as written and are reported. Declarations
//!     leave the tree; the values in effect at the end of the document become
//!     [`Document::attributes`](crate::adoc::ast::Document).
//!
//!     Besides inline content, substitution reaches block attribute values (titles, ids,
//!     roles), image targets and alt text, and link targets. Verbatim content is left
//!     alone. The document title sees the declarations of the document header.

use crate::adoc::assembling::{record, AttributeScope, Resolution};
use crate::adoc::ast::attributes::ElementAttributes;
use crate::adoc::ast::diagnostics::{Diagnostic, DiagnosticKind};
use crate::adoc::ast::elements::{Block, BlockContent, ImageMacro};
use crate::adoc::ast::inlines::{push_inline, Inline, InlineContent};
use crate::adoc::ast::range::Range;
use crate::adoc::config::ParseConfig;
use crate::adoc::transforms::{Runnable, TransformError};
use std::sync::Arc;
use tracing::debug;

pub struct SubstituteAttributes {
    config: Arc<ParseConfig>,
}

impl SubstituteAttributes {
    pub fn new(config: Arc<ParseConfig>) -> Self {
        Self { config }
    }
}

impl Default for SubstituteAttributes {
    fn default() -> Self {
        Self::new(Arc::new(ParseConfig::default()))
    }
}

impl Runnable<Resolution, Resolution> for SubstituteAttributes {
    fn run(&self, mut resolution: Resolution) -> Result<Resolution, TransformError> {
        if !self.config.passes.attributes {
            debug!("attribute substitution skipped");
            return Ok(resolution);
        }

        let source = resolution.source_name.clone();
        let mut substituter = Substituter {
            scope: AttributeScope::from_config(&self.config),
            warnings: Vec::new(),
            source: source.as_deref(),
            substituted: 0,
        };

        let document = &mut resolution.document;
        let mut blocks = std::mem::take(&mut document.blocks);
        let header_len = blocks
            .iter()
            .take_while(|block| matches!(block, Block::AttributeDeclaration(_)))
            .count();
        let body = blocks.split_off(header_len);
        substituter.blocks(blocks);
        if let Some(title) = document.title.as_mut() {
            substituter.inlines(title, &Range::default());
        }
        document.blocks = substituter.blocks(body);

        debug!(
            substituted = substituter.substituted,
            unresolved = substituter.warnings.len(),
            "substituted attributes"
        );
        document.attributes = substituter.scope.into_attributes();
        resolution.warnings.extend(substituter.warnings);
        Ok(resolution)
    }
}

struct Substituter<'a> {
    scope: AttributeScope,
    warnings: Vec<Diagnostic>,
    source: Option<&'a str>,
    substituted: usize,
}

impl Substituter<'_> {
    fn blocks(&mut self, blocks: Vec<Block>) -> Vec<Block> {
        let mut out = Vec::with_capacity(blocks.len());
        for mut block in blocks {
            if let Block::AttributeDeclaration(declaration) = &block {
                for name in self
                    .scope
                    .declare(&declaration.name, declaration.value.as_deref())
                {
                    self.report(&declaration.location, name);
                }
                continue;
            }

            let location = block.range().clone();
            if let Some(attributes) = block.attributes_mut() {
                self.attributes(attributes, &location);
            }
            match &mut block {
                Block::Paragraph(paragraph) => {
                    for line in &mut paragraph.lines {
                        self.inlines(line, &location);
                    }
                }
                Block::Section(section) => {
                    self.inlines(&mut section.title, &location);
                    section.blocks = self.blocks(std::mem::take(&mut section.blocks));
                }
                Block::List(list) => {
                    for item in &mut list.items {
                        let location = item.location.clone();
                        self.attributes(&mut item.attributes, &location);
                        item.elements = self.blocks(std::mem::take(&mut item.elements));
                    }
                }
                Block::Delimited(delimited) => {
                    if let BlockContent::Blocks(children) = &mut delimited.content {
                        *children = self.blocks(std::mem::take(children));
                    }
                }
                Block::Table(table) => {
                    for cell in table.cells_mut() {
                        self.inlines(cell, &location);
                    }
                }
                Block::Image(image) => self.image(&mut image.image, &location),
                _ => {}
            }
            out.push(block);
        }
        out
    }

    fn inlines(&mut self, content: &mut InlineContent, location: &Range) {
        let mut replaced = false;
        for inline in content.iter_mut() {
            match inline {
                Inline::AttributeRef(name) => {
                    let value = self.scope.get(name).map(str::to_string);
                    let text = match value {
                        Some(value) => {
                            self.substituted += 1;
                            value
                        }
                        None => {
                            let literal = format!("{{{}}}", name);
                            let name = name.clone();
                            self.report(location, name);
                            literal
                        }
                    };
                    *inline = Inline::Text(text);
                    replaced = true;
                }
                Inline::Quoted(quoted) => self.inlines(&mut quoted.elements, location),
                Inline::Footnote(footnote) => self.inlines(&mut footnote.elements, location),
                Inline::Link(link) => {
                    link.url = self.text(&link.url, location);
                    self.inlines(&mut link.text, location);
                }
                Inline::Image(image) => self.image(image, location),
                _ => {}
            }
        }
        if replaced {
            let merged = std::mem::take(content)
                .into_iter()
                .fold(Vec::new(), |mut merged, inline| {
                    push_inline(&mut merged, inline);
                    merged
                });
            *content = merged;
        }
    }

    fn image(&mut self, image: &mut ImageMacro, location: &Range) {
        image.path = self.text(&image.path, location);
        image.alt = self.text(&image.alt, location);
        self.attributes(&mut image.attributes, location);
    }

    fn attributes(&mut self, attributes: &mut ElementAttributes, location: &Range) {
        for (_, value) in attributes.values_mut() {
            if value.contains('{') {
                *value = self.text(value, location);
            }
        }
    }

    fn text(&mut self, text: &str, location: &Range) -> String {
        let (result, unresolved) = self.scope.substitute(text);
        if result != text {
            self.substituted += 1;
        }
        for name in unresolved {
            self.report(location, name);
        }
        result
    }

    fn report(&mut self, location: &Range, name: String) {
        record(
            &mut self.warnings,
            location.clone(),
            DiagnosticKind::UnresolvedAttribute { name },
            self.source,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::assembling::stages::Seed;
    use crate::adoc::ast::inlines::plain_text;
    use crate::adoc::parsing::parse_draft_str;

    fn substitute(source: &str, config: ParseConfig) -> Resolution {
        let config = Arc::new(config);
        let draft = parse_draft_str(source, &config);
        let resolution = Seed::new(config.clone()).run(draft).unwrap();
        SubstituteAttributes::new(config).run(resolution).unwrap()
    }

    fn paragraph_text(block: &Block) -> String {
        match block {
            Block::Paragraph(paragraph) => paragraph.text(),
            other => panic!("expected paragraph, got {}", other.node_type()),
        }
    }

    #[test]
    fn test_references_see_only_earlier_definitions() {
        let resolution = substitute(
            "{product} first.\n\n:product: Widget\n\n{product} second.\n",
            ParseConfig::default(),
        );

        let blocks = &resolution.document.blocks;
        assert_eq!(blocks.len(), 2);
        assert_eq!(paragraph_text(&blocks[0]), "{product} first.");
        assert_eq!(paragraph_text(&blocks[1]), "Widget second.");
        assert_eq!(resolution.warnings.len(), 1);
        assert_eq!(resolution.warnings[0].code(), "unresolved-attribute");
    }

    #[test]
    fn test_last_definition_wins() {
        let resolution = substitute(
            ":v: 1\n\nv{v}\n\n:v: 2\n\nv{v}\n",
            ParseConfig::default(),
        );
        let blocks = &resolution.document.blocks;
        assert_eq!(paragraph_text(&blocks[0]), "v1");
        assert_eq!(paragraph_text(&blocks[1]), "v2");
        assert_eq!(resolution.document.attributes.get("v"), Some("2"));
    }

    #[test]
    fn test_text_runs_are_merged() {
        let resolution = substitute(":a: A\n\nx {a} y\n", ParseConfig::default());
        match &resolution.document.blocks[0] {
            Block::Paragraph(paragraph) => {
                assert_eq!(paragraph.lines[0], vec![Inline::text("x A y")])
            }
            other => panic!("expected paragraph, got {}", other.node_type()),
        }
    }

    #[test]
    fn test_header_attributes_apply_to_title() {
        let resolution = substitute(
            "= {product} Guide\n:product: Widget\n\ntext\n",
            ParseConfig::default(),
        );
        assert_eq!(
            resolution.document.title_text().as_deref(),
            Some("Widget Guide")
        );
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_substitution_reaches_titles_images_and_cells() {
        let source = ":img: images\n:who: Ann\n\n.Owner: {who}\nimage::{img}/logo.png[]\n\n|===\n|{who}\n|===\n\n== About {who}\n";
        let resolution = substitute(source, ParseConfig::default());
        let blocks = &resolution.document.blocks;

        match &blocks[0] {
            Block::Image(image) => {
                assert_eq!(image.image.path, "images/logo.png");
                assert_eq!(image.attributes.title(), Some("Owner: Ann"));
            }
            other => panic!("expected image, got {}", other.node_type()),
        }
        match &blocks[1] {
            Block::Table(table) => assert_eq!(plain_text(&table.rows[0].cells[0]), "Ann"),
            other => panic!("expected table, got {}", other.node_type()),
        }
        match &blocks[2] {
            Block::Section(section) => assert_eq!(section.title_text(), "About Ann"),
            other => panic!("expected section, got {}", other.node_type()),
        }
    }

    #[test]
    fn test_config_attributes_are_visible_and_locked() {
        let config = ParseConfig::default().with_attribute("product", "Widget");
        let resolution = substitute(":product: Other\n\n{product}\n", config);
        assert_eq!(paragraph_text(&resolution.document.blocks[0]), "Widget");
        assert_eq!(resolution.document.attributes.get("product"), Some("Widget"));
    }

    #[test]
    fn test_verbatim_content_is_untouched() {
        let resolution = substitute(":a: A\n\n----\n{a}\n----\n", ParseConfig::default());
        match &resolution.document.blocks[0] {
            Block::Delimited(block) => assert_eq!(block.lines().unwrap(), ["{a}"]),
            other => panic!("expected listing, got {}", other.node_type()),
        }
    }
}
