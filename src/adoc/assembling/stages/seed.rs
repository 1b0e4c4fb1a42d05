//! Seed stage
//!
//! Moves the draft into a [`Resolution`]: the blocks and title, the parse-time warnings,
//! and the attributes the configuration defines before the document says anything.

use crate::adoc::assembling::{AttributeScope, Resolution};
use crate::adoc::ast::document::{Document, DraftDocument};
use crate::adoc::config::ParseConfig;
use crate::adoc::transforms::{Runnable, TransformError};
use std::sync::Arc;
use tracing::debug;

pub struct Seed {
    config: Arc<ParseConfig>,
}

impl Seed {
    pub fn new(config: Arc<ParseConfig>) -> Self {
        Self { config }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self::new(Arc::new(ParseConfig::default()))
    }
}

impl Runnable<DraftDocument, Resolution> for Seed {
    fn run(&self, draft: DraftDocument) -> Result<Resolution, TransformError> {
        let document = Document {
            title: draft.title,
            attributes: AttributeScope::from_config(&self.config).into_attributes(),
            blocks: draft.blocks,
            last_updated: self.config.last_updated.clone(),
            ..Document::default()
        };
        debug!(
            blocks = document.blocks.len(),
            warnings = draft.warnings.len(),
            "seeded resolution"
        );
        Ok(Resolution {
            document,
            warnings: draft.warnings,
            source_name: draft.source_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::parsing::parse_draft_str;

    #[test]
    fn test_seed_carries_draft_and_config() {
        let config = ParseConfig::default()
            .with_attribute("product", "Widget")
            .with_last_updated("2024-05-01 10:00:00");
        let draft = parse_draft_str("= Title\n\ntext\n", &config);
        let resolution = Seed::new(Arc::new(config)).run(draft).unwrap();

        let document = &resolution.document;
        assert_eq!(document.title_text().as_deref(), Some("Title"));
        assert_eq!(document.blocks.len(), 1);
        assert_eq!(document.attributes.get("product"), Some("Widget"));
        assert_eq!(document.attributes.get("last-update"), Some("2024-05-01 10:00:00"));
        assert_eq!(document.last_updated.as_deref(), Some("2024-05-01 10:00:00"));
    }
}
