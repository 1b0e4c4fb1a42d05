//! Individual resolution stages
//!
//! Each stage implements the `Runnable` trait. [`Seed`] turns the draft into a
//! [`Resolution`](super::Resolution), the four passes rewrite it in place and [`Finish`]
//! hands out the final document.

pub mod build_toc;
pub mod expand_includes;
pub mod finish;
pub mod resolve_references;
pub mod seed;
pub mod substitute_attributes;

pub use build_toc::BuildToc;
pub use expand_includes::ExpandIncludes;
pub use finish::Finish;
pub use resolve_references::ResolveReferences;
pub use seed::Seed;
pub use substitute_attributes::SubstituteAttributes;
