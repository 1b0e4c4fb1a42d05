//! Parsing
//!
//!     Classified lines in, draft document out. The block parser ([blocks](blocks)) walks
//!     the lines once, calling into the inline parser for every line of text, the list
//!     state machine ([lists](lists)) for list markers and the fence handling
//!     ([delimited](delimited), [tables](tables)) for delimited blocks. Headings come out
//!     as a flat sequence of markers that [sections](sections) nests afterwards.
//!
//!     Nothing is resolved here. Attribute references, footnotes, cross-references and
//!     include directives stay as placeholders in the draft for the resolution stages.
//!
//!     The only fatal error is input that isn't text at all (invalid UTF-8, a failing
//!     reader). Everything else parses to something, even if only to a paragraph.

pub mod attribute_list;
pub mod blocks;
pub mod delimited;
pub mod lists;
pub mod metadata;
pub mod sections;
pub mod tables;

pub use blocks::{BlockParser, Context};

use crate::adoc::ast::diagnostics::Diagnostic;
use crate::adoc::ast::document::DraftDocument;
use crate::adoc::ast::elements::Block;
use crate::adoc::ast::error::ParseError;
use crate::adoc::config::ParseConfig;
use crate::adoc::lexing::source_lines;
use std::io::Read;
use tracing::debug;

/// Read `reader` to the end and parse it into a draft document.
pub fn parse_draft<R: Read>(mut reader: R, config: &ParseConfig) -> Result<DraftDocument, ParseError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let source = decode(bytes)?;
    Ok(parse_draft_str(&source, config))
}

/// Parse source text into a draft document.
pub fn parse_draft_str(source: &str, config: &ParseConfig) -> DraftDocument {
    let lines = source_lines(strip_bom(source));
    let mut parser = BlockParser::new(&lines, Context::Document);
    let blocks = sections::nest(parser.parse_blocks());
    let (title, warnings) = parser.finish();

    let mut draft = DraftDocument::new(blocks);
    draft.title = title;
    draft.warnings = attribute_source(warnings, config.source_name.as_deref());
    draft.source_name = config.source_name.clone();
    debug!(
        blocks = draft.blocks.len(),
        warnings = draft.warnings.len(),
        "parsed draft document"
    );
    draft
}

/// Parse the text of an included file. Headings stay flat (every level, including 0, is
/// a section marker) so the caller can shift and nest them at the point of inclusion.
pub fn parse_fragment(source: &str, source_name: &str) -> (Vec<Block>, Vec<Diagnostic>) {
    let lines = source_lines(strip_bom(source));
    let mut parser = BlockParser::fragment(&lines);
    let blocks = parser.parse_blocks();
    let (_, warnings) = parser.finish();
    (blocks, attribute_source(warnings, Some(source_name)))
}

/// Decode raw input, reporting where the first invalid byte sits.
pub fn decode(bytes: Vec<u8>) -> Result<String, ParseError> {
    String::from_utf8(bytes).map_err(|err| ParseError::InvalidEncoding {
        offset: err.utf8_error().valid_up_to(),
    })
}

fn strip_bom(source: &str) -> &str {
    source.strip_prefix('\u{feff}').unwrap_or(source)
}

fn attribute_source(warnings: Vec<Diagnostic>, source: Option<&str>) -> Vec<Diagnostic> {
    match source {
        Some(source) => warnings
            .into_iter()
            .map(|warning| warning.with_source(source))
            .collect(),
        None => warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_draft_from_reader() {
        let draft = parse_draft("= Title\n\ntext\n".as_bytes(), &ParseConfig::default()).unwrap();
        assert!(draft.title.is_some());
        assert_eq!(draft.blocks.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let bytes: &[u8] = b"ok\n\xff\xfe";
        match parse_draft(bytes, &ParseConfig::default()) {
            Err(ParseError::InvalidEncoding { offset }) => assert_eq!(offset, 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bom_is_ignored() {
        let draft = parse_draft_str("\u{feff}= Title\n", &ParseConfig::default());
        assert!(draft.title.is_some());
    }

    #[test]
    fn test_warnings_carry_source_name() {
        let config = ParseConfig::default().with_source_name("main.adoc");
        let draft = parse_draft_str("----\nunterminated\n", &config);
        assert_eq!(draft.warnings[0].source.as_deref(), Some("main.adoc"));
        assert_eq!(draft.source_name.as_deref(), Some("main.adoc"));
    }

    #[test]
    fn test_fragment_headings_stay_flat() {
        let (blocks, _) = parse_fragment("= Chapter\n\n== Part\ntext\n", "chapter.adoc");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], Block::Section(s) if s.level == 0));
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let source = "= T\n\n* a\n** b\n+\n----\nx\n----\n\n\n. one\n";
        let config = ParseConfig::default();
        assert_eq!(parse_draft_str(source, &config), parse_draft_str(source, &config));
    }
}
