//! Inline macros
//!
//! Builders for the macros recognized inside text. Each takes the pieces the parser already
//! split off (`name`, `target`, the raw text between the brackets) and returns the inline
//! node, or `None` when the combination isn't a macro (empty image target, unknown name),
//! in which case the parser keeps the source as text.

use super::parser::parse_inline_text;
use crate::adoc::ast::elements::ImageMacro;
use crate::adoc::ast::inlines::{CrossReference, FootnoteRef, Inline, Link};
use crate::adoc::parsing::attribute_list::macro_attributes;

const URL_SCHEMES: [&str; 4] = ["http", "https", "ftp", "irc"];

/// Image payload shared by `image:` and `image::`.
pub fn image_macro(target: &str, attributes: &str) -> ImageMacro {
    let mut attrs = macro_attributes(attributes, &["alt", "width", "height"]);
    let alt = attrs.remove("alt");
    let width = attrs.remove("width");
    let height = attrs.remove("height");
    let mut image = ImageMacro::new(target.trim()).with_size(width, height);
    if let Some(alt) = alt {
        image = image.with_alt(alt);
    }
    image.attributes = attrs;
    image
}

pub fn inline_macro(name: &str, target: &str, attributes: &str) -> Option<Inline> {
    match name {
        "image" if !target.is_empty() => Some(Inline::Image(image_macro(target, attributes))),
        "footnote" => Some(Inline::Footnote(FootnoteRef {
            key: non_empty(target),
            elements: parse_inline_text(attributes.trim()),
            index: None,
        })),
        "footnoteref" if target.is_empty() => {
            let (key, text) = match attributes.split_once(',') {
                Some((key, text)) => (key.trim(), text.trim()),
                None => (attributes.trim(), ""),
            };
            let key = non_empty(key)?;
            Some(Inline::Footnote(FootnoteRef {
                key: Some(key),
                elements: parse_inline_text(text),
                index: None,
            }))
        }
        "xref" if !target.is_empty() => Some(Inline::CrossReference(CrossReference::new(
            target,
            non_empty(attributes.trim()),
        ))),
        "link" if !target.is_empty() => Some(Inline::Link(Link {
            url: target.to_string(),
            text: link_text(attributes),
        })),
        "mailto" if !target.is_empty() => Some(Inline::Link(Link {
            url: format!("mailto:{}", target),
            text: link_text(attributes),
        })),
        "pass" if target.is_empty() => Some(Inline::Passthrough(attributes.to_string())),
        scheme if URL_SCHEMES.contains(&scheme) && target.starts_with("//") => {
            Some(Inline::Link(Link {
                url: format!("{}:{}", scheme, target),
                text: link_text(attributes),
            }))
        }
        _ => None,
    }
}

/// Link text is the whole bracket content, unless it is an attribute list with named
/// entries, in which case it is the first positional.
fn link_text(attributes: &str) -> Vec<Inline> {
    let text = if attributes.contains('=') {
        macro_attributes(attributes, &["text"])
            .get("text")
            .unwrap_or_default()
            .to_string()
    } else {
        attributes.trim().to_string()
    };
    parse_inline_text(&text)
}

/// Bare URL found in text. Trailing sentence punctuation is not part of the link; the
/// second value is the text to put back after it.
pub fn bare_url(url: &str) -> (Inline, &str) {
    let end = url.trim_end_matches(['.', ',', ';', ':', '!', '?', ')']).len();
    let (url, rest) = url.split_at(end);
    (
        Inline::Link(Link {
            url: url.to_string(),
            text: Vec::new(),
        }),
        rest,
    )
}

/// Parse `<<id>>` / `<<id,label>>` (delimiters included).
pub fn short_cross_reference(token: &str) -> Option<Inline> {
    let inner = token.strip_prefix("<<")?.strip_suffix(">>")?;
    let (id, label) = match inner.split_once(',') {
        Some((id, label)) => (id.trim(), Some(label.trim().to_string())),
        None => (inner.trim(), None),
    };
    if id.is_empty() || id.contains(char::is_whitespace) {
        return None;
    }
    Some(Inline::CrossReference(CrossReference::new(id, label)))
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Byte index of the `]` closing a bracket opened just before `text`.
pub fn find_closing_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (index, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '[' => depth += 1,
            ']' if depth == 0 => return Some(index),
            ']' => depth -= 1,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::ast::inlines::XrefStatus;

    #[test]
    fn test_image_macro_defaults() {
        let image = image_macro("images/foo.png", "");
        assert_eq!(image.alt, "foo");
        assert_eq!(image.width, None);
    }

    #[test]
    fn test_image_macro_positional_attributes() {
        let image = image_macro("images/foo.png", "the foo.png image, 600, 400");
        assert_eq!(image.alt, "the foo.png image");
        assert_eq!(image.width.as_deref(), Some("600"));
        assert_eq!(image.height.as_deref(), Some("400"));
    }

    #[test]
    fn test_footnote_forms() {
        match inline_macro("footnote", "", "a note") {
            Some(Inline::Footnote(f)) => {
                assert_eq!(f.key, None);
                assert_eq!(f.elements, vec![Inline::text("a note")]);
            }
            other => panic!("unexpected {:?}", other),
        }
        match inline_macro("footnote", "disclaimer", "") {
            Some(Inline::Footnote(f)) => assert!(f.is_reference_only()),
            other => panic!("unexpected {:?}", other),
        }
        match inline_macro("footnoteref", "", "disclaimer,Opinions are my own.") {
            Some(Inline::Footnote(f)) => {
                assert_eq!(f.key.as_deref(), Some("disclaimer"));
                assert!(!f.is_reference_only());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_macro() {
        assert_eq!(inline_macro("kbd", "", "Ctrl"), None);
        assert_eq!(inline_macro("image", "", "alt"), None);
    }

    #[test]
    fn test_url_macro() {
        match inline_macro("https", "//example.org", "Example") {
            Some(Inline::Link(link)) => {
                assert_eq!(link.url, "https://example.org");
                assert_eq!(link.text, vec![Inline::text("Example")]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bare_url_trailing_punctuation() {
        let (link, rest) = bare_url("https://example.org.");
        assert_eq!(
            link,
            Inline::Link(Link {
                url: "https://example.org".into(),
                text: vec![]
            })
        );
        assert_eq!(rest, ".");
    }

    #[test]
    fn test_short_cross_reference() {
        match short_cross_reference("<<intro,the intro>>") {
            Some(Inline::CrossReference(xref)) => {
                assert_eq!(xref.id, "intro");
                assert_eq!(xref.label.as_deref(), Some("the intro"));
                assert_eq!(xref.status, XrefStatus::Pending);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(short_cross_reference("<<not an id>>"), None);
    }

    #[test]
    fn test_closing_bracket() {
        assert_eq!(find_closing_bracket("]rest"), Some(0));
        assert_eq!(find_closing_bracket("a [b] c] d"), Some(7));
        assert_eq!(find_closing_bracket(r"a \] b]"), Some(6));
        assert_eq!(find_closing_bracket("no close"), None);
    }
}
