//! Attribute scope
//!
//!     The attribute values visible at one point of a document walk. Stages that need
//!     attribute values (include targets, substitution) build a scope from the
//!     configuration and feed it every declaration they pass, in document order, so a
//!     reference only sees what was defined above it.
//!
//!     Lookup falls back to the intrinsic attributes (`{plus}`, `{nbsp}`, ...) that every
//!     document has. Attributes from the configuration are locked unless their value was
//!     given as a soft default (`value@`).

use crate::adoc::ast::attributes::DocumentAttributes;
use crate::adoc::config::ParseConfig;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

static ATTRIBUTE_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_][A-Za-z0-9_-]*)\}").unwrap());

/// Value of a predefined attribute.
pub fn intrinsic(name: &str) -> Option<&'static str> {
    let value = match name {
        "empty" => "",
        "sp" => " ",
        "nbsp" => "\u{a0}",
        "zwsp" => "\u{200b}",
        "wj" => "\u{2060}",
        "plus" => "+",
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "apos" => "'",
        "quot" => "\"",
        "startsb" => "[",
        "endsb" => "]",
        "vbar" => "|",
        "caret" => "^",
        "asterisk" => "*",
        "tilde" => "~",
        "backslash" => "\\",
        "backtick" => "`",
        "two-colons" => "::",
        "two-semicolons" => ";;",
        "cpp" => "C++",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "deg" => "\u{b0}",
        "brvbar" => "\u{a6}",
        _ => return None,
    };
    Some(value)
}

#[derive(Debug, Clone, Default)]
pub struct AttributeScope {
    values: DocumentAttributes,
    locked: HashSet<String>,
}

impl AttributeScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope holding the configured attributes and the timestamp attributes.
    pub fn from_config(config: &ParseConfig) -> Self {
        let mut scope = Self::new();
        if let Some(timestamp) = &config.last_updated {
            scope.values.set("docdatetime", timestamp.as_str());
            scope.values.set("last-update", timestamp.as_str());
        }
        for (name, value, locked) in config.initial_attributes() {
            scope.values.set(name, value);
            if locked {
                scope.locked.insert(name.to_string());
            }
        }
        scope
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).or_else(|| intrinsic(name))
    }

    pub fn is_locked(&self, name: &str) -> bool {
        self.locked.contains(name)
    }

    /// Apply `:name: value` (or `:name!:` when `value` is `None`). References to earlier
    /// attributes inside the value are expanded first; the names that could not be
    /// expanded are returned. Declarations of locked attributes are ignored.
    pub fn declare(&mut self, name: &str, value: Option<&str>) -> Vec<String> {
        if self.is_locked(name) {
            return Vec::new();
        }
        match value {
            Some(value) => {
                let (expanded, unresolved) = self.substitute(value);
                self.values.set(name, expanded);
                unresolved
            }
            None => {
                self.values.unset(name);
                Vec::new()
            }
        }
    }

    /// Replace every `{name}` in `text` with its current value. Unknown references stay
    /// as written and are returned, in order of appearance.
    pub fn substitute(&self, text: &str) -> (String, Vec<String>) {
        if !text.contains('{') {
            return (text.to_string(), Vec::new());
        }
        let mut unresolved = Vec::new();
        let result = ATTRIBUTE_REFERENCE.replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            match self.get(name) {
                Some(value) => value.to_string(),
                None => {
                    unresolved.push(name.to_string());
                    caps[0].to_string()
                }
            }
        });
        (result.into_owned(), unresolved)
    }

    /// Attributes defined so far, in definition order. Intrinsic attributes are not
    /// included.
    pub fn attributes(&self) -> &DocumentAttributes {
        &self.values
    }

    pub fn into_attributes(self) -> DocumentAttributes {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declarations_are_ordered() {
        let mut scope = AttributeScope::new();
        assert_eq!(scope.substitute("v{version}").1, vec!["version"]);
        scope.declare("version", Some("1.0"));
        assert_eq!(scope.substitute("v{version}").0, "v1.0");
        scope.declare("version", Some("2.0"));
        assert_eq!(scope.substitute("v{version}").0, "v2.0");
        scope.declare("version", None);
        assert_eq!(scope.substitute("v{version}").0, "v{version}");
    }

    #[test]
    fn test_values_reference_earlier_attributes() {
        let mut scope = AttributeScope::new();
        scope.declare("product", Some("Widget"));
        assert!(scope.declare("title", Some("{product} Guide")).is_empty());
        assert_eq!(scope.get("title"), Some("Widget Guide"));
        assert_eq!(scope.declare("other", Some("{missing}")), vec!["missing"]);
    }

    #[test]
    fn test_intrinsic_attributes() {
        let scope = AttributeScope::new();
        assert_eq!(scope.substitute("a{sp}{plus}{sp}b").0, "a + b");
        assert_eq!(scope.get("two-colons"), Some("::"));
        assert!(scope.attributes().is_empty());
    }

    #[test]
    fn test_config_attributes_are_locked_unless_soft() {
        let config = ParseConfig::default()
            .with_attribute("product", "Widget")
            .with_attribute("version", "1.0@")
            .with_last_updated("2024-01-01");
        let mut scope = AttributeScope::from_config(&config);
        scope.declare("product", Some("Other"));
        scope.declare("version", Some("2.0"));

        assert_eq!(scope.get("product"), Some("Widget"));
        assert_eq!(scope.get("version"), Some("2.0"));
        assert_eq!(scope.get("docdatetime"), Some("2024-01-01"));
        assert!(scope.is_locked("product"));
    }
}
