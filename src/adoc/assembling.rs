//! Assembling
//!
//!     Turns a draft document into the final document handed to renderers. The draft's
//!     placeholders are resolved by four stages that always run in this order:
//!
//!         1. expand_includes: splice included files into the tree (recursively, to a
//!            bounded depth).
//!         2. substitute_attributes: replace `{name}` references with the value the
//!            attribute has at that point in the document.
//!         3. resolve_references: give sections ids, build the reference table, resolve
//!            cross-references and number footnotes.
//!         4. build_toc: insert the table of contents, if one is requested.
//!
//!     Each stage walks the whole tree, is a no-op on a tree without anything to do, and
//!     can be switched off through [`Passes`](crate::adoc::config::Passes) (the TOC through
//!     its own config). Problems are recorded on the [`Resolution`] passed from stage to
//!     stage and returned next to the final document; none of them aborts resolution.
//!
//!     [`DraftDocument::resolve`] consumes the draft: include expansion invalidates the
//!     draft's positions, so a draft is resolved at most once.

pub mod scope;
pub mod stages;

pub use scope::AttributeScope;
pub use stages::{BuildToc, ExpandIncludes, Finish, ResolveReferences, Seed, SubstituteAttributes};

use crate::adoc::ast::diagnostics::{Diagnostic, DiagnosticKind};
use crate::adoc::ast::document::{Document, DraftDocument, Resolved};
use crate::adoc::ast::range::Range;
use crate::adoc::config::ParseConfig;
use crate::adoc::includes::FileResolver;
use crate::adoc::transforms::{Transform, TransformError};
use std::sync::Arc;
use tracing::warn;

/// The document between stages, with every problem found so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub document: Document,
    pub warnings: Vec<Diagnostic>,
    pub source_name: Option<String>,
}

/// Log a resolution problem and add it to `warnings`. `source` names the file it was
/// found in, when known.
pub(crate) fn record(
    warnings: &mut Vec<Diagnostic>,
    range: Range,
    kind: DiagnosticKind,
    source: Option<&str>,
) {
    let mut diagnostic = Diagnostic::warning(range, kind);
    if let Some(source) = source {
        diagnostic = diagnostic.with_source(source);
    }
    warn!(code = diagnostic.code(), "{}", diagnostic);
    warnings.push(diagnostic);
}

/// The full resolution chain for one configuration.
pub fn resolution_pipeline(
    config: Arc<ParseConfig>,
    resolver: Arc<dyn FileResolver>,
) -> Transform<DraftDocument, Resolved> {
    Transform::from_fn(Ok)
        .then(Seed::new(config.clone()))
        .then(ExpandIncludes::new(config.clone(), resolver))
        .then(SubstituteAttributes::new(config.clone()))
        .then(ResolveReferences::new(config.clone()))
        .then(BuildToc::new(config))
        .then(Finish)
}

impl DraftDocument {
    /// Run every resolution stage and return the final document with all warnings.
    pub fn resolve(
        self,
        config: &ParseConfig,
        resolver: Arc<dyn FileResolver>,
    ) -> Result<Resolved, TransformError> {
        resolution_pipeline(Arc::new(config.clone()), resolver).run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::includes::MemoryResolver;
    use crate::adoc::parsing::parse_draft_str;

    #[test]
    fn test_resolve_runs_every_stage() {
        let config = ParseConfig::default().with_toc(crate::adoc::config::TocPlacement::Auto);
        let source = ":name: World\n\n== Hello {name}\n\nSee <<_hello_world>>.footnote:[Note.]\n";
        let resolved = parse_draft_str(source, &config)
            .resolve(&config, Arc::new(MemoryResolver::new()))
            .unwrap();

        assert!(!resolved.has_warnings(), "{:?}", resolved.warnings);
        let document = &resolved.document;
        assert_eq!(document.attributes.get("name"), Some("World"));
        assert!(document.element_references.contains_key("_hello_world"));
        assert_eq!(document.footnotes.len(), 1);
        assert!(matches!(
            document.blocks[0],
            crate::adoc::ast::elements::Block::TableOfContents(_)
        ));
    }

    #[test]
    fn test_draft_warnings_are_carried_over() {
        let config = ParseConfig::default();
        let resolved = parse_draft_str("....\nopen\n", &config)
            .resolve(&config, Arc::new(MemoryResolver::new()))
            .unwrap();
        assert_eq!(resolved.warnings.len(), 1);
        assert_eq!(resolved.warnings[0].code(), "unterminated-block");
    }
}
