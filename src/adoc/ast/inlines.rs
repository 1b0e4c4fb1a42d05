//! Inline AST nodes
//!
//!     A paragraph line is a sequence of [`Inline`] nodes. Styled spans nest further inline
//!     content; everything else is a leaf. Placeholders (attribute references, footnotes,
//!     cross-references) are parsed as unresolved nodes and only get their final shape in
//!     the resolution stages.

use super::elements::image::ImageMacro;
use serde::Serialize;

/// Sequence of inline nodes making up one line (or one title, one cell...).
pub type InlineContent = Vec<Inline>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Inline {
    /// Plain text run.
    Text(String),
    /// Styled span (`*bold*`, `_italic_`, ...).
    Quoted(QuotedText),
    /// Explicit line break (` +` at the end of a line).
    LineBreak,
    /// `{name}` placeholder, replaced during attribute substitution.
    AttributeRef(String),
    Image(ImageMacro),
    Footnote(FootnoteRef),
    CrossReference(CrossReference),
    Link(Link),
    /// Text protected from any further interpretation (`+++x+++`, `pass:[x]`).
    Passthrough(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QuoteKind {
    Bold,
    Italic,
    Monospace,
    Mark,
    Superscript,
    Subscript,
}

impl QuoteKind {
    /// Delimiter character for this kind.
    pub fn delimiter(self) -> char {
        match self {
            QuoteKind::Bold => '*',
            QuoteKind::Italic => '_',
            QuoteKind::Monospace => '`',
            QuoteKind::Mark => '#',
            QuoteKind::Superscript => '^',
            QuoteKind::Subscript => '~',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotedText {
    pub kind: QuoteKind,
    /// Doubled delimiters (`**x**`) bind anywhere, single ones only at word boundaries.
    pub unconstrained: bool,
    pub elements: InlineContent,
}

/// A footnote definition or reference.
///
/// `footnote:[text]` and `footnote:key[text]` define a footnote; `footnote:key[]` refers to
/// one defined elsewhere (before or after). `index` is assigned during resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootnoteRef {
    pub key: Option<String>,
    pub elements: InlineContent,
    pub index: Option<usize>,
}

impl FootnoteRef {
    pub fn is_reference_only(&self) -> bool {
        self.key.is_some() && self.elements.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub enum XrefStatus {
    Pending,
    Resolved,
    Broken,
    /// Points into another document (`other.adoc#id`).
    External { path: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossReference {
    pub id: String,
    pub label: Option<String>,
    pub status: XrefStatus,
}

impl CrossReference {
    pub fn new(target: &str, label: Option<String>) -> Self {
        let label = label.filter(|l| !l.trim().is_empty());
        match target.split_once('#') {
            Some((path, fragment)) if !path.is_empty() => Self {
                id: fragment.to_string(),
                label,
                status: XrefStatus::External {
                    path: path.to_string(),
                },
            },
            Some((_, fragment)) => Self {
                id: fragment.to_string(),
                label,
                status: XrefStatus::Pending,
            },
            None if target.ends_with(".adoc") => Self {
                id: String::new(),
                label,
                status: XrefStatus::External {
                    path: target.to_string(),
                },
            },
            None => Self {
                id: target.to_string(),
                label,
                status: XrefStatus::Pending,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub url: String,
    /// Empty when the URL itself is the link text.
    pub text: InlineContent,
}

impl Inline {
    pub fn text(s: impl Into<String>) -> Self {
        Inline::Text(s.into())
    }

    /// Inline macros (as opposed to text, spans and placeholders).
    pub fn is_macro(&self) -> bool {
        matches!(
            self,
            Inline::Image(_) | Inline::Footnote(_) | Inline::CrossReference(_) | Inline::Link(_)
        )
    }

    /// Nested inline content for container nodes.
    pub fn children_mut(&mut self) -> Option<&mut InlineContent> {
        match self {
            Inline::Quoted(quoted) => Some(&mut quoted.elements),
            Inline::Footnote(footnote) => Some(&mut footnote.elements),
            Inline::Link(link) => Some(&mut link.text),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&InlineContent> {
        match self {
            Inline::Quoted(quoted) => Some(&quoted.elements),
            Inline::Footnote(footnote) => Some(&footnote.elements),
            Inline::Link(link) => Some(&link.text),
            _ => None,
        }
    }
}

/// Append text to a node sequence, merging with a trailing text run.
pub fn push_text(content: &mut InlineContent, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(last)) = content.last_mut() {
        last.push_str(text);
    } else {
        content.push(Inline::Text(text.to_string()));
    }
}

/// Append a node, merging text runs.
pub fn push_inline(content: &mut InlineContent, inline: Inline) {
    match inline {
        Inline::Text(text) => push_text(content, &text),
        other => content.push(other),
    }
}

/// Flatten inline content to its textual rendering (used for titles, ids, TOC entries).
pub fn plain_text(content: &[Inline]) -> String {
    let mut out = String::new();
    for inline in content {
        match inline {
            Inline::Text(text) | Inline::Passthrough(text) => out.push_str(text),
            Inline::Quoted(quoted) => out.push_str(&plain_text(&quoted.elements)),
            Inline::LineBreak => out.push(' '),
            Inline::AttributeRef(name) => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
            Inline::Image(image) => out.push_str(&image.alt),
            Inline::Footnote(_) => {}
            Inline::CrossReference(xref) => match &xref.label {
                Some(label) => out.push_str(label),
                None => out.push_str(&xref.id),
            },
            Inline::Link(link) if link.text.is_empty() => out.push_str(&link.url),
            Inline::Link(link) => out.push_str(&plain_text(&link.text)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_text_merges_runs() {
        let mut content = vec![Inline::text("a")];
        push_text(&mut content, "b");
        push_inline(&mut content, Inline::LineBreak);
        push_text(&mut content, "c");
        assert_eq!(
            content,
            vec![Inline::text("ab"), Inline::LineBreak, Inline::text("c")]
        );
    }

    #[test]
    fn test_cross_reference_targets() {
        let local = CrossReference::new("intro", None);
        assert_eq!(local.status, XrefStatus::Pending);

        let external = CrossReference::new("other.adoc#setup", Some("Setup".into()));
        assert_eq!(external.id, "setup");
        assert_eq!(
            external.status,
            XrefStatus::External {
                path: "other.adoc".into()
            }
        );
    }

    #[test]
    fn test_plain_text_of_nested_spans() {
        let content = vec![
            Inline::text("a "),
            Inline::Quoted(QuotedText {
                kind: QuoteKind::Bold,
                unconstrained: false,
                elements: vec![Inline::text("bold")],
            }),
            Inline::text(" word"),
        ];
        assert_eq!(plain_text(&content), "a bold word");
    }
}
