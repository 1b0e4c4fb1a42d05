//! Output formats
//!
//!     The front end does not render documents. The one format it writes is its own
//!     markup: [markup](markup) turns a block tree back into canonical source, which tests
//!     use to check that parsing is stable (parse, write, parse again, same tree).

pub mod markup;

pub use markup::{serialize_blocks, serialize_draft, MarkupSerializer};
