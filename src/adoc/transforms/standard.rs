//! Standard transforms
//!
//! Entry points from source text. [`STRING_TO_DRAFT`] uses the default configuration;
//! [`string_to_draft`] builds the same chain around a given one.

use crate::adoc::ast::document::DraftDocument;
use crate::adoc::config::ParseConfig;
use crate::adoc::parsing::parse_draft_str;
use crate::adoc::transforms::{Runnable, Transform, TransformError};
use once_cell::sync::Lazy;
use std::sync::Arc;

pub type DraftTransform = Transform<String, DraftDocument>;

/// Source text → draft document.
pub struct ParseDraft {
    config: Arc<ParseConfig>,
}

impl ParseDraft {
    pub fn new(config: Arc<ParseConfig>) -> Self {
        Self { config }
    }
}

impl Default for ParseDraft {
    fn default() -> Self {
        Self::new(Arc::new(ParseConfig::default()))
    }
}

impl Runnable<String, DraftDocument> for ParseDraft {
    fn run(&self, source: String) -> Result<DraftDocument, TransformError> {
        Ok(parse_draft_str(&source, &self.config))
    }
}

pub static STRING_TO_DRAFT: Lazy<DraftTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(ParseDraft::default()));

pub fn string_to_draft(config: Arc<ParseConfig>) -> DraftTransform {
    Transform::from_fn(Ok).then(ParseDraft::new(config))
}
