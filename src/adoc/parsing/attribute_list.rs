//! Attribute list grammar
//!
//! The bracketed lists found on block attribute lines (`[quote#intro.lead, Author]`) and at
//! the end of macros (`image:foo.png[Alt text, 600, 400]`) share one grammar:
//!
//!     list       = entry ("," entry)*
//!     entry      = named | positional
//!     named      = name "=" value
//!     positional = value
//!     value      = quoted | unquoted
//!
//! Quoted values may contain commas; `\"` escapes the quote. Parsing never fails from the
//! caller's point of view: input the grammar rejects falls back to a plain comma split.

use crate::adoc::ast::attributes::{ElementAttributes, ATTR_STYLE, ATTR_TITLE};
use chumsky::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeEntry {
    Positional(String),
    Named { name: String, value: String },
}

fn attribute_list_parser() -> impl Parser<char, Vec<AttributeEntry>, Error = Simple<char>> {
    let ws = filter(|c: &char| *c == ' ' || *c == '\t').repeated();

    let quoted = |quote: char| {
        just('\\')
            .ignore_then(just(quote))
            .or(filter(move |c: &char| *c != quote))
            .repeated()
            .collect::<String>()
            .delimited_by(just(quote), just(quote))
    };

    let unquoted = none_of(",")
        .repeated()
        .collect::<String>()
        .map(|s| s.trim().to_string());

    let value = ws
        .clone()
        .ignore_then(quoted('"').or(quoted('\'')))
        .then_ignore(ws.clone())
        .or(unquoted);

    let name = filter(|c: &char| c.is_alphanumeric() || *c == '-' || *c == '_')
        .repeated()
        .at_least(1)
        .collect::<String>();

    let named = ws
        .clone()
        .ignore_then(name)
        .then_ignore(ws)
        .then_ignore(just('='))
        .then(value.clone())
        .map(|(name, value)| AttributeEntry::Named { name, value });

    let positional = value.map(AttributeEntry::Positional);

    named
        .or(positional)
        .separated_by(just(','))
        .then_ignore(end())
}

/// Parse the text between the brackets of an attribute list.
pub fn parse_attribute_list(text: &str) -> Vec<AttributeEntry> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    attribute_list_parser()
        .parse(text)
        .unwrap_or_else(|_| split_fallback(text))
}

fn split_fallback(text: &str) -> Vec<AttributeEntry> {
    text.split(',')
        .map(|part| match part.split_once('=') {
            Some((name, value)) if is_name(name.trim()) => AttributeEntry::Named {
                name: name.trim().to_string(),
                value: value.trim().trim_matches('"').to_string(),
            },
            _ => AttributeEntry::Positional(part.trim().to_string()),
        })
        .collect()
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Attributes of a block attribute line. The first positional may use the
/// `style#id.role%option` shorthand.
pub fn block_attributes(text: &str) -> ElementAttributes {
    let mut attrs = ElementAttributes::new();
    let mut index = 0;
    for entry in parse_attribute_list(text) {
        match entry {
            AttributeEntry::Positional(value) => {
                index += 1;
                if value.is_empty() {
                    continue;
                }
                if index == 1 {
                    apply_shorthand(&mut attrs, &value);
                } else if index == 2 && attrs.style() == Some("source") {
                    attrs.set("language", value.clone());
                }
                attrs.set(index.to_string(), value);
            }
            AttributeEntry::Named { name, value } => set_named(&mut attrs, name, value),
        }
    }
    attrs
}

/// Attributes of a macro, naming positional entries after `positional_names`.
pub fn macro_attributes(text: &str, positional_names: &[&str]) -> ElementAttributes {
    let mut attrs = ElementAttributes::new();
    let mut index = 0;
    for entry in parse_attribute_list(text) {
        match entry {
            AttributeEntry::Positional(value) => {
                index += 1;
                if value.is_empty() {
                    continue;
                }
                match positional_names.get(index - 1) {
                    Some(name) => attrs.set(*name, value),
                    None => attrs.set(index.to_string(), value),
                }
            }
            AttributeEntry::Named { name, value } => set_named(&mut attrs, name, value),
        }
    }
    attrs
}

fn set_named(attrs: &mut ElementAttributes, name: String, value: String) {
    match name.as_str() {
        "id" => attrs.set_custom_id(value),
        "role" => {
            for role in value.split_whitespace() {
                attrs.add_role(role);
            }
        }
        "opts" | "options" => {
            for option in value.split(',').map(str::trim).filter(|o| !o.is_empty()) {
                attrs.set_option(option);
            }
            attrs.set(name, value);
        }
        _ => attrs.set(name, value),
    }
}

fn apply_shorthand(attrs: &mut ElementAttributes, value: &str) {
    let is_marker = |c: char| c == '#' || c == '.' || c == '%';
    let style_end = value.find(is_marker).unwrap_or(value.len());
    let style = value[..style_end].trim();
    if !style.is_empty() {
        attrs.set(ATTR_STYLE, style);
    }

    let mut rest = &value[style_end..];
    while let Some(marker) = rest.chars().next() {
        let body = &rest[marker.len_utf8()..];
        let end = body.find(is_marker).unwrap_or(body.len());
        let segment = body[..end].trim();
        if !segment.is_empty() {
            match marker {
                '#' => attrs.set_custom_id(segment),
                '.' => attrs.add_role(segment),
                _ => attrs.set_option(segment),
            }
        }
        rest = &body[end..];
    }
}

/// Title set through a `.Title` line.
pub fn set_title(attrs: &mut ElementAttributes, title: &str) {
    attrs.set(ATTR_TITLE, title.trim());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_and_named() {
        assert_eq!(
            parse_attribute_list("the foo.png image, 600, 400"),
            vec![
                AttributeEntry::Positional("the foo.png image".into()),
                AttributeEntry::Positional("600".into()),
                AttributeEntry::Positional("400".into()),
            ]
        );
        assert_eq!(
            parse_attribute_list("link=http://foo.bar"),
            vec![AttributeEntry::Named {
                name: "link".into(),
                value: "http://foo.bar".into()
            }]
        );
    }

    #[test]
    fn test_quoted_values_keep_commas() {
        assert_eq!(
            parse_attribute_list(r#""a, b", 600"#),
            vec![
                AttributeEntry::Positional("a, b".into()),
                AttributeEntry::Positional("600".into()),
            ]
        );
        assert_eq!(
            parse_attribute_list(r#"alt="a, b""#),
            vec![AttributeEntry::Named {
                name: "alt".into(),
                value: "a, b".into()
            }]
        );
    }

    #[test]
    fn test_empty_list() {
        assert!(parse_attribute_list("").is_empty());
        assert!(parse_attribute_list("   ").is_empty());
    }

    #[test]
    fn test_shorthand() {
        let attrs = block_attributes("quote#intro.lead.big%collapsible, Author");
        assert_eq!(attrs.style(), Some("quote"));
        assert_eq!(attrs.id(), Some("intro"));
        assert_eq!(attrs.roles(), vec!["lead", "big"]);
        assert!(attrs.has_option("collapsible"));
        assert_eq!(attrs.positional(2), Some("Author"));
    }

    #[test]
    fn test_id_only_shorthand() {
        let attrs = block_attributes("#img-foobar");
        assert_eq!(attrs.id(), Some("img-foobar"));
        assert!(attrs.has_custom_id());
        assert_eq!(attrs.style(), None);
    }

    #[test]
    fn test_source_language() {
        let attrs = block_attributes("source,rust");
        assert_eq!(attrs.style(), Some("source"));
        assert_eq!(attrs.get("language"), Some("rust"));
    }

    #[test]
    fn test_macro_positional_names() {
        let attrs = macro_attributes("Alt, 600, 400, extra", &["alt", "width", "height"]);
        assert_eq!(attrs.get("alt"), Some("Alt"));
        assert_eq!(attrs.get("width"), Some("600"));
        assert_eq!(attrs.get("height"), Some("400"));
        assert_eq!(attrs.get("4"), Some("extra"));
    }

    #[test]
    fn test_options_attribute() {
        let attrs = block_attributes(r#"options="header,footer""#);
        assert!(attrs.has_option("header"));
        assert!(attrs.has_option("footer"));
    }
}
