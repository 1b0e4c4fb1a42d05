//! Attribute sets
//!
//! Two kinds of attributes exist:
//!
//! - [`ElementAttributes`]: the attribute set carried by every block, collected from the
//!   metadata lines (`[#id]`, `.Title`, `[.role]`, `[link=...]`) that precede it. Keys are
//!   plain strings; positional entries use their 1-based index as key. Options (`%name`)
//!   are stored as `<name>-option` flags with an empty value.
//! - [`DocumentAttributes`]: the document-wide name → value table that placeholders
//!   resolve against. Insertion order is the definition order.

use linked_hash_map::LinkedHashMap;
use serde::Serialize;
use std::collections::BTreeMap;

pub const ATTR_ID: &str = "id";
pub const ATTR_CUSTOM_ID: &str = "custom-id";
pub const ATTR_TITLE: &str = "title";
pub const ATTR_ROLE: &str = "role";
pub const ATTR_STYLE: &str = "style";
pub const ATTR_LINK: &str = "link";
pub const ATTR_REFTEXT: &str = "reftext";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ElementAttributes(BTreeMap<String, String>);

impl ElementAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = (&String, &mut String)> {
        self.0.iter_mut()
    }

    pub fn id(&self) -> Option<&str> {
        self.get(ATTR_ID)
    }

    /// Sets an identifier written by the author (as opposed to a generated one).
    pub fn set_custom_id(&mut self, id: impl Into<String>) {
        self.set(ATTR_ID, id);
        self.set(ATTR_CUSTOM_ID, "true");
    }

    pub fn has_custom_id(&self) -> bool {
        self.contains(ATTR_CUSTOM_ID)
    }

    pub fn title(&self) -> Option<&str> {
        self.get(ATTR_TITLE)
    }

    pub fn style(&self) -> Option<&str> {
        self.get(ATTR_STYLE)
    }

    pub fn roles(&self) -> Vec<&str> {
        self.get(ATTR_ROLE)
            .map(|roles| roles.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn add_role(&mut self, role: &str) {
        let joined = match self.get(ATTR_ROLE) {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, role),
            _ => role.to_string(),
        };
        self.set(ATTR_ROLE, joined);
    }

    pub fn set_option(&mut self, option: &str) {
        self.set(format!("{}-option", option), "");
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.contains(&format!("{}-option", option))
    }

    /// Positional attribute, 1-based.
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.get(&index.to_string())
    }

    /// Layer `other` on top of this set. Roles accumulate, everything else is replaced.
    pub fn merge(&mut self, other: ElementAttributes) {
        for (key, value) in other.0 {
            if key == ATTR_ROLE {
                for role in value.split_whitespace() {
                    self.add_role(role);
                }
            } else {
                self.0.insert(key, value);
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ElementAttributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Document-wide attribute table, in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentAttributes(LinkedHashMap<String, String>);

impl DocumentAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Define or redefine an attribute. A redefinition moves it to the end, so iteration
    /// order reflects the latest definition.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.0.remove(&name);
        self.0.insert(name, value.into());
    }

    pub fn unset(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
