//! Reference resolution stage
//!
//!     Runs once the tree is complete, so cross-references and footnote references may
//!     point forward. In order:
//!
//!         1. Ids: every author-written id is reserved, then each section without one gets
//!            an id generated from its title (`_getting_started`), suffixed `_2`, `_3`...
//!            when taken.
//!         2. Reference table: id → (kind, title, child-index path) for every block with
//!            an id. A repeated id keeps its first element and is reported.
//!         3. Cross-references: `<<id>>` turns `Resolved` when the id is in the table
//!            (taking the target's title as label if it has none) or `Broken` when not.
//!            Inter-document references are left alone.
//!         4. Footnotes: numbered in first-use order. A keyed footnote is numbered once;
//!            every later use of the key, before or after the definition, shares its
//!            number.

use crate::adoc::assembling::{record, Resolution};
use crate::adoc::ast::attributes::ATTR_REFTEXT;
use crate::adoc::ast::diagnostics::{Diagnostic, DiagnosticKind};
use crate::adoc::ast::document::{Document, ElementReferences, Footnote, ReferenceTarget};
use crate::adoc::ast::elements::{Block, BlockContent, DelimitedBlock};
use crate::adoc::ast::inlines::{plain_text, Inline, InlineContent, XrefStatus};
use crate::adoc::ast::range::Range;
use crate::adoc::ast::traits::{for_each_inline_mut, visit_inlines_mut, walk_blocks, Visitor};
use crate::adoc::config::ParseConfig;
use crate::adoc::parsing::sections::{generate_id, IdRegistry};
use crate::adoc::transforms::{Runnable, TransformError};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

pub struct ResolveReferences {
    config: Arc<ParseConfig>,
}

impl ResolveReferences {
    pub fn new(config: Arc<ParseConfig>) -> Self {
        Self { config }
    }
}

impl Default for ResolveReferences {
    fn default() -> Self {
        Self::new(Arc::new(ParseConfig::default()))
    }
}

impl Runnable<Resolution, Resolution> for ResolveReferences {
    fn run(&self, mut resolution: Resolution) -> Result<Resolution, TransformError> {
        if !self.config.passes.references {
            debug!("reference resolution skipped");
            return Ok(resolution);
        }

        let source = resolution.source_name.clone();
        let source = source.as_deref();
        let warnings = &mut resolution.warnings;
        let document = &mut resolution.document;

        let prefix = document
            .attributes
            .get("idprefix")
            .unwrap_or(self.config.id_prefix())
            .to_string();
        let separator = document
            .attributes
            .get("idseparator")
            .unwrap_or(self.config.id_separator())
            .to_string();
        assign_section_ids(&mut document.blocks, &prefix, &separator);

        document.element_references = build_references(&document.blocks, warnings, source);
        resolve_cross_references(document, warnings, source);
        number_footnotes(document, warnings, source);

        debug!(
            references = document.element_references.len(),
            footnotes = document.footnotes.len(),
            "resolved references"
        );
        Ok(resolution)
    }
}

fn assign_section_ids(blocks: &mut [Block], prefix: &str, separator: &str) {
    struct CustomIds<'a>(Vec<&'a str>);
    impl<'a> Visitor<'a> for CustomIds<'a> {
        fn visit_block(&mut self, block: &'a Block) {
            if let Some(attributes) = block.attributes() {
                if let (Some(id), true) = (attributes.id(), attributes.has_custom_id()) {
                    self.0.push(id);
                }
            }
        }
    }

    let mut registry = IdRegistry::new();
    let mut custom = CustomIds(Vec::new());
    walk_blocks(&mut custom, blocks);
    for id in custom.0 {
        registry.reserve(id);
    }
    generate_ids(blocks, &mut registry, prefix, separator);
}

fn generate_ids(blocks: &mut [Block], registry: &mut IdRegistry, prefix: &str, separator: &str) {
    for block in blocks {
        match block {
            Block::Section(section) => {
                if section.id().is_none() {
                    let id = generate_id(&section.title_text(), prefix, separator);
                    let id = registry.unique(id, separator);
                    section.attributes.set("id", id);
                }
                generate_ids(&mut section.blocks, registry, prefix, separator);
            }
            Block::List(list) => {
                for item in &mut list.items {
                    generate_ids(&mut item.elements, registry, prefix, separator);
                }
            }
            Block::Delimited(DelimitedBlock {
                content: BlockContent::Blocks(children),
                ..
            }) => generate_ids(children, registry, prefix, separator),
            _ => {}
        }
    }
}

fn build_references(
    blocks: &[Block],
    warnings: &mut Vec<Diagnostic>,
    source: Option<&str>,
) -> ElementReferences {
    let mut found = Vec::new();
    collect_targets(blocks, &mut Vec::new(), &mut found);

    let mut references = ElementReferences::new();
    for (id, target, range) in found {
        if references.contains_key(&id) {
            record(warnings, range, DiagnosticKind::DuplicateIdentifier { id }, source);
        } else {
            references.insert(id, target);
        }
    }
    references
}

fn collect_targets(
    blocks: &[Block],
    path: &mut Vec<usize>,
    found: &mut Vec<(String, ReferenceTarget, Range)>,
) {
    for (index, block) in blocks.iter().enumerate() {
        path.push(index);
        if let Some(id) = block.id() {
            let target = ReferenceTarget {
                kind: block.node_type(),
                title: reference_title(block),
                path: path.clone(),
            };
            found.push((id.to_string(), target, block.range().clone()));
        }
        match block {
            Block::Section(section) => collect_targets(&section.blocks, path, found),
            Block::Delimited(DelimitedBlock {
                content: BlockContent::Blocks(children),
                ..
            }) => collect_targets(children, path, found),
            Block::List(list) => {
                for (item_index, item) in list.items.iter().enumerate() {
                    path.push(item_index);
                    collect_targets(&item.elements, path, found);
                    path.pop();
                }
            }
            _ => {}
        }
        path.pop();
    }
}

/// Text a reference to `block` shows when it has no label of its own.
fn reference_title(block: &Block) -> Option<String> {
    let attributes = block.attributes()?;
    if let Some(reftext) = attributes.get(ATTR_REFTEXT) {
        return Some(reftext.to_string());
    }
    match block {
        Block::Section(section) => Some(section.title_text()),
        _ => attributes.title().map(str::to_string),
    }
}

fn resolve_cross_references(
    document: &mut Document,
    warnings: &mut Vec<Diagnostic>,
    source: Option<&str>,
) {
    let references = &document.element_references;
    let mut resolve = |inline: &mut Inline, range: &Range| {
        let Inline::CrossReference(xref) = inline else {
            return;
        };
        if xref.status != XrefStatus::Pending {
            return;
        }
        match references.get(&xref.id) {
            Some(target) => {
                xref.status = XrefStatus::Resolved;
                if xref.label.is_none() {
                    xref.label = target.title.clone();
                }
            }
            None => {
                xref.status = XrefStatus::Broken;
                record(
                    warnings,
                    range.clone(),
                    DiagnosticKind::UnknownCrossReference { id: xref.id.clone() },
                    source,
                );
            }
        }
    };
    if let Some(title) = document.title.as_mut() {
        visit_inlines_mut(title, &Range::default(), &mut resolve);
    }
    for_each_inline_mut(&mut document.blocks, &mut resolve);
}

fn number_footnotes(document: &mut Document, warnings: &mut Vec<Diagnostic>, source: Option<&str>) {
    let definitions = footnote_definitions(&document.blocks);
    let mut footnotes: Vec<Footnote> = Vec::new();
    let mut by_key: BTreeMap<String, usize> = BTreeMap::new();

    for_each_inline_mut(&mut document.blocks, &mut |inline, range| {
        let Inline::Footnote(footnote) = inline else {
            return;
        };
        let index = match &footnote.key {
            Some(key) => match by_key.get(key) {
                Some(index) => Some(*index),
                None => match definitions.get(key) {
                    Some(elements) => {
                        let index = footnotes.len() + 1;
                        footnotes.push(Footnote {
                            index,
                            key: Some(key.clone()),
                            elements: elements.clone(),
                        });
                        by_key.insert(key.clone(), index);
                        Some(index)
                    }
                    None => {
                        record(
                            warnings,
                            range.clone(),
                            DiagnosticKind::UnknownFootnote { key: key.clone() },
                            source,
                        );
                        None
                    }
                },
            },
            None => {
                let index = footnotes.len() + 1;
                footnotes.push(Footnote {
                    index,
                    key: None,
                    elements: footnote.elements.clone(),
                });
                Some(index)
            }
        };
        footnote.index = index;
    });

    document.footnotes = footnotes;
    document.footnote_references = by_key;
}

/// First definition of every keyed footnote, wherever it appears.
fn footnote_definitions(blocks: &[Block]) -> HashMap<String, InlineContent> {
    struct Definitions(HashMap<String, InlineContent>);
    impl<'a> Visitor<'a> for Definitions {
        fn visit_inline(&mut self, inline: &'a Inline) {
            if let Inline::Footnote(footnote) = inline {
                if let Some(key) = &footnote.key {
                    if !footnote.elements.is_empty() && !self.0.contains_key(key) {
                        self.0.insert(key.clone(), footnote.elements.clone());
                    }
                }
            }
        }
    }
    let mut definitions = Definitions(HashMap::new());
    walk_blocks(&mut definitions, blocks);
    definitions.0
}

/// Plain text of the footnote numbered `index`, for diagnostics and tooling.
pub fn footnote_text(document: &Document, index: usize) -> Option<String> {
    document.footnote(index).map(|footnote| plain_text(&footnote.elements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::assembling::stages::{Seed, SubstituteAttributes};
    use crate::adoc::ast::inlines::CrossReference;
    use crate::adoc::parsing::parse_draft_str;

    fn resolve(source: &str) -> Resolution {
        let config = Arc::new(ParseConfig::default());
        let draft = parse_draft_str(source, &config);
        let resolution = Seed::new(config.clone()).run(draft).unwrap();
        let resolution = SubstituteAttributes::new(config.clone())
            .run(resolution)
            .unwrap();
        ResolveReferences::new(config).run(resolution).unwrap()
    }

    fn cross_references(document: &Document) -> Vec<CrossReference> {
        struct Xrefs(Vec<CrossReference>);
        impl<'a> Visitor<'a> for Xrefs {
            fn visit_inline(&mut self, inline: &'a Inline) {
                if let Inline::CrossReference(xref) = inline {
                    self.0.push(xref.clone());
                }
            }
        }
        let mut xrefs = Xrefs(Vec::new());
        walk_blocks(&mut xrefs, &document.blocks);
        xrefs.0
    }

    #[test]
    fn test_section_ids_are_generated_and_unique() {
        let resolution = resolve("== Getting Started\n\n== Getting Started\n\n[#_usage]\n== Usage\n\n== Usage\n");
        let ids: Vec<_> = resolution
            .document
            .blocks
            .iter()
            .filter_map(|block| block.id().map(str::to_string))
            .collect();
        assert_eq!(
            ids,
            vec!["_getting_started", "_getting_started_2", "_usage", "_usage_2"]
        );
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_forward_cross_reference_resolves_with_title() {
        let resolution = resolve("See <<_details>>.\n\n== Details\n\ntext\n");
        let xrefs = cross_references(&resolution.document);
        assert_eq!(xrefs[0].status, XrefStatus::Resolved);
        assert_eq!(xrefs[0].label.as_deref(), Some("Details"));

        let target = &resolution.document.element_references["_details"];
        assert_eq!(target.kind, "Section");
        assert_eq!(target.path, vec![1]);
        assert!(matches!(
            resolution.document.resolve_reference("_details"),
            Some(Block::Section(_))
        ));
    }

    #[test]
    fn test_unknown_cross_reference_is_broken() {
        let resolution = resolve("See <<nowhere>> and <<other.adoc#there>>.\n");
        let xrefs = cross_references(&resolution.document);
        assert_eq!(xrefs[0].status, XrefStatus::Broken);
        assert!(matches!(xrefs[1].status, XrefStatus::External { .. }));
        assert_eq!(resolution.warnings.len(), 1);
        assert_eq!(resolution.warnings[0].code(), "unknown-xref");
    }

    #[test]
    fn test_duplicate_ids_keep_the_first() {
        let resolution = resolve("[#dup]\nfirst\n\n[#dup]\nsecond\n");
        assert_eq!(resolution.document.element_references["dup"].path, vec![0]);
        assert_eq!(resolution.warnings.len(), 1);
        assert_eq!(resolution.warnings[0].code(), "duplicate-id");
    }

    #[test]
    fn test_reference_paths_reach_into_lists() {
        let resolution = resolve("* item\n+\n[#inner]\n----\ncode\n----\n");
        let target = &resolution.document.element_references["inner"];
        assert_eq!(target.path, vec![0, 0, 1]);
        assert!(matches!(
            resolution.document.resolve_reference("inner"),
            Some(Block::Delimited(_))
        ));
    }

    #[test]
    fn test_footnotes_numbered_in_first_use_order() {
        let resolution = resolve(
            "Uses footnote:disclaimer[] early.\n\nPlain.footnote:[First.]\n\nDefined.footnote:disclaimer[Not advice.]\n",
        );
        let document = &resolution.document;
        assert!(resolution.warnings.is_empty(), "{:?}", resolution.warnings);
        assert_eq!(document.footnotes.len(), 2);
        assert_eq!(footnote_text(document, 1).as_deref(), Some("Not advice."));
        assert_eq!(footnote_text(document, 2).as_deref(), Some("First."));
        assert_eq!(document.footnote_references.get("disclaimer"), Some(&1));
    }

    #[test]
    fn test_footnote_inside_a_span_keeps_its_place() {
        let resolution = resolve(
            "*Bold claim.footnote:[First]* then plain.footnote:[Second]\n\n_Aside.footnote:[Third]_ closing.footnote:[Fourth]\n",
        );
        let document = &resolution.document;
        let texts: Vec<_> = (1..=4)
            .map(|index| footnote_text(document, index).unwrap_or_default())
            .collect();
        assert_eq!(texts, vec!["First", "Second", "Third", "Fourth"]);
    }

    #[test]
    fn test_unknown_footnote_key() {
        let resolution = resolve("Text.footnote:ghost[]\n");
        assert!(resolution.document.footnotes.is_empty());
        assert_eq!(resolution.warnings[0].code(), "unknown-footnote");
    }
}
