//! Document loading utilities
//!
//! This module provides `DocumentLoader` - a utility for loading source text from files
//! or strings and running transforms on it. This is used by the CLI and by tests.
//!
//! # Example
//!
//! ```rust
//! use adoc::adoc::loader::DocumentLoader;
//! use adoc::adoc::transforms::standard::STRING_TO_DRAFT;
//!
//! // From file: includes resolve next to the file
//! let resolved = DocumentLoader::from_path("guide.adoc")?.parse()?;
//!
//! // From string
//! let draft = DocumentLoader::from_string("* item\n").parse_draft()?;
//!
//! // Custom transform
//! let draft = DocumentLoader::from_string("text\n").with(&STRING_TO_DRAFT)?;
//! ```

use crate::adoc::assembling::resolution_pipeline;
use crate::adoc::ast::document::{DraftDocument, Resolved};
use crate::adoc::ast::error::ParseError;
use crate::adoc::config::ParseConfig;
use crate::adoc::includes::{FileResolver, FsResolver};
use crate::adoc::parsing::{decode, parse_draft, parse_draft_str};
use crate::adoc::transforms::{Transform, TransformError};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error that can occur when loading documents
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The input is not text
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A stage of the pipeline failed
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),
}

/// Document loader with transform shortcuts
///
/// Holds the source text and the configuration to parse it with. A loader built from a
/// path names its diagnostics after the file and, unless the configuration says
/// otherwise, resolves includes relative to the file's directory.
pub struct DocumentLoader {
    source: String,
    path: Option<PathBuf>,
    config: ParseConfig,
}

impl DocumentLoader {
    /// Load from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(DocumentLoader {
            source: decode(bytes)?,
            path: Some(path.to_path_buf()),
            config: ParseConfig::default(),
        })
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: source.into(),
            path: None,
            config: ParseConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ParseConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration parsing will use, completed from the file path when there is one.
    pub fn config(&self) -> ParseConfig {
        let mut config = self.config.clone();
        if let Some(path) = &self.path {
            if config.source_name.is_none() {
                config.source_name = Some(path.display().to_string());
            }
            if config.base_dir == Path::new(".") {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    config.base_dir = parent.to_path_buf();
                }
            }
        }
        config
    }

    /// Run a custom transform on the source
    ///
    /// This is the generic method that the shortcuts build on.
    pub fn with<O: 'static>(&self, transform: &Transform<String, O>) -> Result<O, LoaderError> {
        Ok(transform.run(self.source.clone())?)
    }

    /// Parse the source into a draft document, leaving every placeholder unresolved.
    pub fn parse_draft(&self) -> Result<DraftDocument, LoaderError> {
        Ok(parse_draft_str(&self.source, &self.config()))
    }

    /// Parse and resolve, fetching includes through `resolver`.
    pub fn resolve(&self, resolver: Arc<dyn FileResolver>) -> Result<Resolved, LoaderError> {
        let config = Arc::new(self.config());
        let draft = parse_draft_str(&self.source, &config);
        Ok(resolution_pipeline(config, resolver).run(draft)?)
    }

    /// Parse and resolve, reading includes from disk.
    ///
    /// This is a shortcut for `.resolve()` with an [`FsResolver`] using the configured
    /// include timeout.
    pub fn parse(&self) -> Result<Resolved, LoaderError> {
        self.resolve(Arc::new(fs_resolver(&self.config)))
    }

    /// Get the raw source string
    pub fn source(&self) -> String {
        self.source.clone()
    }
}

fn fs_resolver(config: &ParseConfig) -> FsResolver {
    match config.include_timeout_ms {
        Some(ms) => FsResolver::new().with_timeout(Duration::from_millis(ms)),
        None => FsResolver::new(),
    }
}

/// Read, parse and resolve a document in one call.
pub fn parse_document<R: Read>(
    reader: R,
    config: &ParseConfig,
    resolver: Arc<dyn FileResolver>,
) -> Result<Resolved, LoaderError> {
    let draft = parse_draft(reader, config)?;
    Ok(draft.resolve(config, resolver)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::ast::elements::Block;
    use crate::adoc::includes::MemoryResolver;
    use crate::adoc::transforms::standard::STRING_TO_DRAFT;

    #[test]
    fn test_from_string_parses_draft() {
        let draft = DocumentLoader::from_string("* a\n* b\n").parse_draft().unwrap();
        assert!(matches!(draft.blocks[0], Block::List(_)));
    }

    #[test]
    fn test_custom_transform() {
        let loader = DocumentLoader::from_string("text\n");
        assert_eq!(loader.with(&STRING_TO_DRAFT).unwrap().blocks.len(), 1);
        assert_eq!(loader.source(), "text\n");
    }

    #[test]
    fn test_resolve_with_memory_resolver() {
        let resolver = MemoryResolver::new().with_file("part.adoc", "from part\n");
        let resolved = DocumentLoader::from_string("include::part.adoc[]\n")
            .resolve(Arc::new(resolver))
            .unwrap();
        assert!(!resolved.has_warnings());
        assert_eq!(resolved.document.blocks.len(), 1);
    }

    #[test]
    fn test_from_path_uses_file_directory() {
        let dir = std::env::temp_dir().join(format!("adoc-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("main.adoc"), "include::part.adoc[]\n").unwrap();
        std::fs::write(dir.join("part.adoc"), "== Part\n").unwrap();

        let loader = DocumentLoader::from_path(dir.join("main.adoc")).unwrap();
        assert_eq!(loader.config().base_dir, dir);
        let resolved = loader.parse().unwrap();
        assert!(!resolved.has_warnings(), "{:?}", resolved.warnings);
        assert!(matches!(resolved.document.blocks[0], Block::Section(_)));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = DocumentLoader::from_path("/nonexistent/doc.adoc").err().unwrap();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn test_parse_document_from_reader() {
        let resolved = parse_document(
            "= Title\n\n== Section\n".as_bytes(),
            &ParseConfig::default(),
            Arc::new(MemoryResolver::new()),
        )
        .unwrap();
        assert_eq!(resolved.document.title_text().as_deref(), Some("Title"));
    }
}
