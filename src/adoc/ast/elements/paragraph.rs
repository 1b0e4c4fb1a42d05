//! Paragraph element
//!
//! A paragraph is a run of consecutive text lines. Each source line keeps its own inline
//! sequence, since line breaks matter to renderers.

use super::super::attributes::ElementAttributes;
use super::super::inlines::{plain_text, InlineContent};
use super::super::range::Range;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub attributes: ElementAttributes,
    pub lines: Vec<InlineContent>,
    pub location: Range,
}

impl Paragraph {
    pub fn new(lines: Vec<InlineContent>) -> Self {
        Self {
            attributes: ElementAttributes::new(),
            lines,
            location: Range::default(),
        }
    }

    /// Preferred builder
    pub fn at(mut self, location: Range) -> Self {
        self.location = location;
        self
    }

    /// Lines flattened to text, joined with newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| plain_text(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
