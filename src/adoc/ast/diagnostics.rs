//! Recoverable problems found while parsing or resolving
//!
//! Nothing here aborts a parse. The block parser records warnings on the draft document
//! (list nesting beyond the supported depth, unterminated fences), and each resolution
//! stage records its own (unresolved attributes, broken cross-references, failed
//! includes). A caller decides whether warnings fail the build.

use super::range::Range;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum DiagnosticKind {
    #[error("unresolved attribute reference '{name}'")]
    UnresolvedAttribute { name: String },
    #[error("unknown cross-reference target '{id}'")]
    UnknownCrossReference { id: String },
    #[error("unknown footnote '{key}'")]
    UnknownFootnote { key: String },
    #[error("include depth of {max} exceeded at '{target}'")]
    IncludeDepthExceeded { target: String, max: usize },
    #[error("failed to include '{target}': {message}")]
    IncludeFailed { target: String, message: String },
    #[error("duplicate identifier '{id}'")]
    DuplicateIdentifier { id: String },
    #[error("list nesting deeper than {max} levels folded into the deepest level")]
    ListDepthExceeded { max: usize },
    #[error("unterminated {kind} block")]
    UnterminatedBlock { kind: String },
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::UnresolvedAttribute { .. } => "unresolved-attribute",
            DiagnosticKind::UnknownCrossReference { .. } => "unknown-xref",
            DiagnosticKind::UnknownFootnote { .. } => "unknown-footnote",
            DiagnosticKind::IncludeDepthExceeded { .. } => "include-depth",
            DiagnosticKind::IncludeFailed { .. } => "include-failed",
            DiagnosticKind::DuplicateIdentifier { .. } => "duplicate-id",
            DiagnosticKind::ListDepthExceeded { .. } => "list-depth",
            DiagnosticKind::UnterminatedBlock { .. } => "unterminated-block",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: DiagnosticSeverity,
    pub kind: DiagnosticKind,
    /// File the problem was found in, when known (included files, named inputs).
    pub source: Option<String>,
}

impl Diagnostic {
    pub fn new(range: Range, severity: DiagnosticSeverity, kind: DiagnosticKind) -> Self {
        Self {
            range,
            severity,
            kind,
            source: None,
        }
    }

    pub fn warning(range: Range, kind: DiagnosticKind) -> Self {
        Self::new(range, DiagnosticSeverity::Warning, kind)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self.range.start.line + 1;
        match &self.source {
            Some(source) => write!(
                f,
                "{} [{}]: {} at {}:{}",
                self.severity,
                self.code(),
                self.kind,
                source,
                line
            ),
            None => write!(
                f,
                "{} [{}]: {} at line {}",
                self.severity,
                self.code(),
                self.kind,
                line
            ),
        }
    }
}
