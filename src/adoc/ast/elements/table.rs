//! Table element
//!
//! `|===` fenced rows of `|`-separated cells. The column count comes from the `cols`
//! attribute or, failing that, from the first row line.

use super::super::attributes::ElementAttributes;
use super::super::inlines::InlineContent;
use super::super::range::Range;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<InlineContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub attributes: ElementAttributes,
    pub columns: usize,
    pub header: Option<TableRow>,
    pub rows: Vec<TableRow>,
    pub location: Range,
}

impl Table {
    pub fn new(columns: usize) -> Self {
        Self {
            attributes: ElementAttributes::new(),
            columns,
            header: None,
            rows: Vec::new(),
            location: Range::default(),
        }
    }

    /// Preferred builder
    pub fn at(mut self, location: Range) -> Self {
        self.location = location;
        self
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut InlineContent> {
        self.header
            .iter_mut()
            .chain(self.rows.iter_mut())
            .flat_map(|row| row.cells.iter_mut())
    }
}
