//! Section nesting and ids
//!
//!     The block parser emits each heading as an empty [`Section`] in the flat block
//!     sequence. [`nest`] then moves every following block into the nearest open section,
//!     closing sections when a heading of the same or a shallower level shows up:
//!
//!         == A          Section A
//!         text            Paragraph
//!         === B           Section B
//!         text              Paragraph
//!         == C          Section C
//!
//!     [`flatten`] undoes this, so that content spliced in later (includes) can be nested
//!     again in one go.

use crate::adoc::ast::elements::{Block, Section};
use std::collections::HashSet;

/// Nest a flat block sequence under its section headings.
pub fn nest(blocks: Vec<Block>) -> Vec<Block> {
    let mut root = Vec::new();
    let mut open: Vec<Section> = Vec::new();
    for block in blocks {
        match block {
            Block::Section(section) => {
                while open.last().is_some_and(|top| top.level >= section.level) {
                    close_top(&mut open, &mut root);
                }
                open.push(section);
            }
            other => match open.last_mut() {
                Some(section) => section.blocks.push(other),
                None => root.push(other),
            },
        }
    }
    while !open.is_empty() {
        close_top(&mut open, &mut root);
    }
    root
}

fn close_top(open: &mut Vec<Section>, root: &mut Vec<Block>) {
    if let Some(section) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.blocks.push(Block::Section(section)),
            None => root.push(Block::Section(section)),
        }
    }
}

/// Pull nested sections back out into one flat sequence. Sections inside other containers
/// (delimited blocks, list items) are left where they are.
pub fn flatten(blocks: Vec<Block>) -> Vec<Block> {
    let mut flat = Vec::with_capacity(blocks.len());
    flatten_into(blocks, &mut flat);
    flat
}

fn flatten_into(blocks: Vec<Block>, flat: &mut Vec<Block>) {
    for block in blocks {
        match block {
            Block::Section(mut section) => {
                let children = std::mem::take(&mut section.blocks);
                flat.push(Block::Section(section));
                flatten_into(children, flat);
            }
            other => flat.push(other),
        }
    }
}

/// Id derived from a section title: lowercased, word characters kept, runs of spaces,
/// dots and hyphens replaced by `separator`.
///
///     "Section Title" → "_section_title"
pub fn generate_id(title: &str, prefix: &str, separator: &str) -> String {
    let mut body = String::with_capacity(title.len());
    let mut pending_separator = false;
    for c in title.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_separator && !body.is_empty() {
                body.push_str(separator);
            }
            pending_separator = false;
            body.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '.' {
            pending_separator = true;
        }
    }
    format!("{}{}", prefix, body)
}

/// Ids handed out so far in one document.
#[derive(Debug, Default)]
pub struct IdRegistry {
    seen: HashSet<String>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id written by the author. Returns `false` when it is already taken.
    pub fn reserve(&mut self, id: &str) -> bool {
        self.seen.insert(id.to_string())
    }

    /// Register a generated id, appending `_2`, `_3`, ... until it is unique.
    pub fn unique(&mut self, id: String, separator: &str) -> String {
        if self.seen.insert(id.clone()) {
            return id;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}{}{}", id, separator, n);
            if self.seen.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
