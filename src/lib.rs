//! # adoc
//!
//! A front end for AsciiDoc-style markup: source text in, a resolved block tree out.
//!
//! Parsing produces a draft tree with every placeholder left as written. Resolution runs
//! over the draft in a fixed order (includes, attributes, references, table of contents)
//! and hands back the final document together with the warnings it collected. Nothing
//! here renders output.
//!
//! ```rust-example
//! use adoc::adoc::{parse_draft_str, FsResolver, ParseConfig};
//! use std::sync::Arc;
//!
//! let config = ParseConfig::default();
//! let draft = parse_draft_str("= Guide\n\n* one\n** two\n", &config);
//! let resolved = draft.resolve(&config, Arc::new(FsResolver::new()))?;
//! ```
//!
//! For test helpers, see the [testing module](adoc::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod adoc;
