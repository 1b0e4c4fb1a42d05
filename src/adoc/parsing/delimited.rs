//! Delimited blocks
//!
//! A fence opens a block that runs to the next line identical to it. Verbatim kinds
//! (listing, literal, passthrough) keep their lines untouched; compound kinds (example,
//! quote, sidebar, open) parse their inside as blocks. Comment blocks are dropped and
//! tables go to [tables](super::tables).
//!
//! A fence that is never closed runs to the end of the input and is reported.

use super::blocks::{BlockParser, Context};
use super::metadata::Metadata;
use super::tables::parse_table;
use crate::adoc::ast::diagnostics::{Diagnostic, DiagnosticKind};
use crate::adoc::ast::elements::{Block, DelimitedBlock, DelimitedKind};
use crate::adoc::lexing::lines_range;

impl<'a> BlockParser<'a> {
    pub(super) fn parse_delimited(
        &mut self,
        metadata: Metadata,
        delimiter: &str,
        kind: DelimitedKind,
    ) -> Option<Block> {
        let open_index = self.cursor.position();
        let open = self.cursor.advance()?;
        let body_start = self.cursor.position();
        let close = self.cursor.find(|line| line.text.trim_end() == delimiter);
        let body = match close {
            Some(close) => self.cursor.slice(body_start, close),
            None => self.cursor.slice(body_start, usize::MAX),
        };
        let after = close.map(|c| c + 1).unwrap_or(body_start + body.len());
        self.cursor.reset_to(after);

        if close.is_none() {
            self.warn(Diagnostic::warning(
                open.range(),
                DiagnosticKind::UnterminatedBlock {
                    kind: kind.to_string(),
                },
            ));
        }

        let location = lines_range(self.cursor.slice(open_index, after));
        let attributes = metadata.into_attributes();
        let block = match kind {
            DelimitedKind::Comment => return None,
            DelimitedKind::Table => Block::Table(parse_table(body, attributes).at(location)),
            kind if kind.is_verbatim() => {
                let lines = body.iter().map(|line| line.text.clone()).collect();
                let mut block = DelimitedBlock::verbatim(kind, lines).at(location);
                block.attributes = attributes;
                Block::Delimited(block)
            }
            kind => {
                let mut inner = BlockParser::new(body, Context::Delimited);
                let blocks = inner.parse_blocks();
                let (_, warnings) = inner.finish();
                self.warnings.extend(warnings);
                let mut block = DelimitedBlock::compound(kind, blocks).at(location);
                block.attributes = attributes;
                Block::Delimited(block)
            }
        };
        Some(block)
    }
}
