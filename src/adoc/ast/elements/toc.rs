//! Table of contents
//!
//! [`TocMacro`] marks where `toc::[]` was written; [`TableOfContents`] is the materialized
//! outline built from the section tree during resolution.

use super::super::attributes::ElementAttributes;
use super::super::range::Range;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocMacro {
    pub attributes: ElementAttributes,
    pub location: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub id: String,
    pub level: usize,
    pub title: String,
    pub children: Vec<TocEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableOfContents {
    pub levels: usize,
    pub entries: Vec<TocEntry>,
    pub location: Range,
}

impl TableOfContents {
    /// Total number of entries at every depth.
    pub fn len(&self) -> usize {
        fn count(entries: &[TocEntry]) -> usize {
            entries.iter().map(|e| 1 + count(&e.children)).sum()
        }
        count(&self.entries)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
