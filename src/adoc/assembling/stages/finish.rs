//! Final stage: hand out the document and everything reported on the way.

use crate::adoc::assembling::Resolution;
use crate::adoc::ast::document::Resolved;
use crate::adoc::transforms::{Runnable, TransformError};
use tracing::debug;

#[derive(Debug, Default)]
pub struct Finish;

impl Runnable<Resolution, Resolved> for Finish {
    fn run(&self, resolution: Resolution) -> Result<Resolved, TransformError> {
        debug!(
            blocks = resolution.document.blocks.len(),
            references = resolution.document.element_references.len(),
            footnotes = resolution.document.footnotes.len(),
            warnings = resolution.warnings.len(),
            "resolved document"
        );
        Ok(Resolved {
            document: resolution.document,
            warnings: resolution.warnings,
        })
    }
}
