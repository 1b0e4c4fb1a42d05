//! Testing utilities for tree assertions
//!
//! Checking a parsed tree by hand means a `match` per level and a `panic!` per wrong
//! variant:
//!
//! ```rust-example
//! match &draft.blocks[0] {
//!     Block::List(list) => {
//!         assert_eq!(list.items.len(), 2);
//!         match &list.items[0].elements[1] {
//!             Block::List(nested) => assert_eq!(nested.items[0].level, 2),
//!             other => panic!("expected list, got {}", other.node_type()),
//!         }
//!     }
//!     other => panic!("expected list, got {}", other.node_type()),
//! }
//! ```
//!
//! The fluent API states the same thing as a shape:
//!
//! ```rust-example
//! use adoc::adoc::testing::assert_doc;
//!
//! assert_doc(&draft)
//!     .block_count(1)
//!     .block(0, |block| {
//!         block.assert_list().item_count(2).item(0, |item| {
//!             item.text("first").sublist(|nested| {
//!                 nested.item(0, |item| {
//!                     item.level(2);
//!                 });
//!             });
//!         });
//!     });
//! ```
//!
//! Failures name the path to the offending node (`blocks[0]:items[0]:elements[1]`).
//!
//! Every block kind has an assertion type reached through [`BlockAssertion`]
//! (`assert_list`, `assert_table`, ...).

mod assertions;
mod matchers;

pub use assertions::{
    assert_blocks, assert_doc, BlockAssertion, BlockTree, DelimitedAssertion, DocumentAssertion,
    ImageAssertion, ListAssertion, ListItemAssertion, ParagraphAssertion, SectionAssertion,
    TableAssertion,
};
pub use matchers::TextMatch;
