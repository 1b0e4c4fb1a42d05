//! Main module for adoc library functionality
//!
//!     Source text goes through two phases:
//!
//!         bytes ──decode──▶ lines ──classify──▶ block parser ──▶ DraftDocument
//!         DraftDocument ──includes──▶ attributes ──▶ references ──▶ toc ──▶ Resolved
//!
//!     The first phase is [parsing](parsing) (with [lexing](lexing) for line kinds and
//!     [inlines](inlines) for the content of each line). The second is
//!     [assembling](assembling), a chain of [transforms](transforms) over the draft.
//!     [loader](loader) wires both together for files and strings.

pub mod assembling;
pub mod ast;
pub mod config;
pub mod formats;
pub mod includes;
pub mod inlines;
pub mod lexing;
pub mod loader;
pub mod parsing;
pub mod testing;
pub mod transforms;

pub use ast::{Diagnostic, DiagnosticKind, Document, DraftDocument, ParseError, Resolved};
pub use config::ParseConfig;
pub use includes::{FileResolver, FsResolver, MemoryResolver, ResolveError};
pub use loader::{parse_document, DocumentLoader, LoaderError};
pub use parsing::{parse_draft, parse_draft_str};
pub use transforms::TransformError;
