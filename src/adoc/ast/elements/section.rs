//! Section element
//!
//! A heading (`== Title` … `====== Title`) and every block after it up to the next heading
//! of the same or a shallower level. Sections always carry an id: the author's, or one
//! generated from the title.

use super::super::attributes::ElementAttributes;
use super::super::inlines::{plain_text, InlineContent};
use super::super::range::Range;
use super::Block;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// 1 for `==`, up to 5 for `======`.
    pub level: usize,
    pub title: InlineContent,
    pub attributes: ElementAttributes,
    pub blocks: Vec<Block>,
    pub location: Range,
}

impl Section {
    pub fn new(level: usize, title: InlineContent) -> Self {
        Self {
            level,
            title,
            attributes: ElementAttributes::new(),
            blocks: Vec::new(),
            location: Range::default(),
        }
    }

    /// Preferred builder
    pub fn at(mut self, location: Range) -> Self {
        self.location = location;
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes.id()
    }

    pub fn title_text(&self) -> String {
        plain_text(&self.title)
    }
}
