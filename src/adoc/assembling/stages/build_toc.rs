//! Table of contents stage
//!
//!     Builds a [`TableOfContents`] from the section tree and puts it where the
//!     configuration (or the document's `:toc:` attribute) asks for it:
//!
//!         auto        first block of the document
//!         preamble    right before the first section
//!         macro       in place of the first `toc::[]`; without one no TOC is inserted
//!
//!     `:toclevels:` (or the configured depth) limits which sections get entries. Running
//!     the stage on a tree that already has a TOC does not add a second one. Leftover
//!     `toc::[]` macros are always removed from the final tree.

use crate::adoc::assembling::Resolution;
use crate::adoc::ast::elements::{
    Block, BlockContent, DelimitedBlock, TableOfContents, TocEntry,
};
use crate::adoc::ast::range::Range;
use crate::adoc::ast::traits::{walk_blocks, Visitor};
use crate::adoc::config::{ParseConfig, TocPlacement};
use crate::adoc::transforms::{Runnable, TransformError};
use std::sync::Arc;
use tracing::debug;

pub struct BuildToc {
    config: Arc<ParseConfig>,
}

impl BuildToc {
    pub fn new(config: Arc<ParseConfig>) -> Self {
        Self { config }
    }
}

impl Default for BuildToc {
    fn default() -> Self {
        Self::new(Arc::new(ParseConfig::default()))
    }
}

impl Runnable<Resolution, Resolution> for BuildToc {
    fn run(&self, mut resolution: Resolution) -> Result<Resolution, TransformError> {
        let document = &mut resolution.document;
        let attribute = document.attributes.get("toc");
        let enabled = self.config.toc.enabled || attribute.is_some();
        let placement = attribute
            .filter(|value| !value.trim().is_empty())
            .map(TocPlacement::from_attribute)
            .unwrap_or(self.config.toc.placement);
        let levels = document
            .attributes
            .get("toclevels")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(self.config.toc.levels);

        if enabled && !contains_toc(&document.blocks) {
            let toc = TableOfContents {
                levels,
                entries: toc_entries(&document.blocks, levels),
                location: Range::default(),
            };
            debug!(entries = toc.len(), ?placement, "built table of contents");
            let blocks = &mut document.blocks;
            match placement {
                TocPlacement::Auto => blocks.insert(0, Block::TableOfContents(toc)),
                TocPlacement::Preamble => {
                    let index = blocks
                        .iter()
                        .position(|block| matches!(block, Block::Section(_)))
                        .unwrap_or(blocks.len());
                    blocks.insert(index, Block::TableOfContents(toc));
                }
                TocPlacement::Macro => {
                    if !replace_first_macro(blocks, &mut Some(toc)) {
                        debug!("no toc macro, table of contents dropped");
                    }
                }
            }
        } else if !enabled {
            debug!("table of contents disabled");
        }

        remove_toc_macros(&mut document.blocks);
        Ok(resolution)
    }
}

/// Entries for every section up to `levels` deep, nested like the sections.
pub fn toc_entries(blocks: &[Block], levels: usize) -> Vec<TocEntry> {
    blocks
        .iter()
        .filter_map(|block| match block {
            Block::Section(section) if section.level <= levels => Some(TocEntry {
                id: section.id().unwrap_or_default().to_string(),
                level: section.level,
                title: section.title_text(),
                children: toc_entries(&section.blocks, levels),
            }),
            _ => None,
        })
        .collect()
}

fn contains_toc(blocks: &[Block]) -> bool {
    struct Finder(bool);
    impl<'a> Visitor<'a> for Finder {
        fn visit_block(&mut self, block: &'a Block) {
            if matches!(block, Block::TableOfContents(_)) {
                self.0 = true;
            }
        }
    }
    let mut finder = Finder(false);
    walk_blocks(&mut finder, blocks);
    finder.0
}

/// Put `toc` in place of the first `toc::[]`, searching in document order.
fn replace_first_macro(blocks: &mut [Block], toc: &mut Option<TableOfContents>) -> bool {
    for block in blocks.iter_mut() {
        if let Block::TocMacro(toc_macro) = block {
            if let Some(mut toc) = toc.take() {
                toc.location = toc_macro.location.clone();
                *block = Block::TableOfContents(toc);
                return true;
            }
        }
        let found = match block {
            Block::List(list) => list
                .items
                .iter_mut()
                .any(|item| replace_first_macro(&mut item.elements, toc)),
            other => other
                .child_blocks_mut()
                .is_some_and(|children| replace_first_macro(children, toc)),
        };
        if found {
            return true;
        }
    }
    false
}

fn remove_toc_macros(blocks: &mut Vec<Block>) {
    blocks.retain(|block| !matches!(block, Block::TocMacro(_)));
    for block in blocks.iter_mut() {
        match block {
            Block::List(list) => {
                for item in &mut list.items {
                    remove_toc_macros(&mut item.elements);
                }
            }
            Block::Section(section) => remove_toc_macros(&mut section.blocks),
            Block::Delimited(DelimitedBlock {
                content: BlockContent::Blocks(children),
                ..
            }) => remove_toc_macros(children),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::assembling::stages::{ResolveReferences, Seed, SubstituteAttributes};
    use crate::adoc::parsing::parse_draft_str;

    const OUTLINE: &str = "Preamble.\n\n== One\n\n=== One A\n\n==== Deep\n\n== Two\n";

    fn build(source: &str, config: ParseConfig) -> Resolution {
        let config = Arc::new(config);
        let draft = parse_draft_str(source, &config);
        let resolution = Seed::new(config.clone()).run(draft).unwrap();
        let resolution = SubstituteAttributes::new(config.clone()).run(resolution).unwrap();
        let resolution = ResolveReferences::new(config.clone()).run(resolution).unwrap();
        BuildToc::new(config).run(resolution).unwrap()
    }

    fn toc_at(blocks: &[Block], index: usize) -> &TableOfContents {
        match &blocks[index] {
            Block::TableOfContents(toc) => toc,
            other => panic!("expected toc at {}, got {}", index, other.node_type()),
        }
    }

    #[test]
    fn test_auto_placement_and_levels() {
        let resolution = build(OUTLINE, ParseConfig::default().with_toc(TocPlacement::Auto));
        let toc = toc_at(&resolution.document.blocks, 0);

        assert_eq!(toc.levels, 2);
        assert_eq!(toc.len(), 3);
        assert_eq!(toc.entries[0].id, "_one");
        assert_eq!(toc.entries[0].children[0].title, "One A");
        assert!(toc.entries[0].children[0].children.is_empty());
        assert_eq!(toc.entries[1].title, "Two");
    }

    #[test]
    fn test_preamble_placement_from_attribute() {
        let source = format!(":toc: preamble\n:toclevels: 3\n\n{}", OUTLINE);
        let resolution = build(&source, ParseConfig::default());
        let blocks = &resolution.document.blocks;

        assert!(matches!(blocks[0], Block::Paragraph(_)));
        assert_eq!(toc_at(blocks, 1).len(), 4);
        assert!(matches!(blocks[2], Block::Section(_)));
    }

    #[test]
    fn test_macro_placement() {
        let source = ":toc: macro\n\nIntro.\n\ntoc::[]\n\n== One\n";
        let resolution = build(source, ParseConfig::default());
        let blocks = &resolution.document.blocks;
        assert_eq!(toc_at(blocks, 1).len(), 1);
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn test_disabled_toc_removes_macros() {
        let resolution = build("toc::[]\n\n== One\n", ParseConfig::default());
        let blocks = &resolution.document.blocks;
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::Section(_)));
    }

    #[test]
    fn test_toc_is_not_inserted_twice() {
        let config = Arc::new(ParseConfig::default().with_toc(TocPlacement::Auto));
        let resolution = build(OUTLINE, (*config).clone());
        let again = BuildToc::new(config).run(resolution.clone()).unwrap();
        assert_eq!(again.document.blocks, resolution.document.blocks);
    }
}
