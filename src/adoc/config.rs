//! Parse configuration
//!
//!     [`ParseConfig`] is the one value threaded through parsing and resolution. It is
//!     never global: two documents parsed at the same time with different configs cannot
//!     see each other's settings.
//!
//!     Every field has a default, so a YAML file only needs the keys it changes:
//!
//!         attributes:
//!           product: Widget
//!           version: 2.1@
//!         base-dir: docs
//!         max-include-depth: 8
//!         toc:
//!           enabled: true
//!           placement: macro
//!
//!     Attributes given here are locked: an in-document `:product: Other` is ignored.
//!     A value ending in `@` is a soft default the document may override.

use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;
pub const DEFAULT_TOC_LEVELS: usize = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a generated table of contents goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TocPlacement {
    /// After the document header, before the first block.
    #[default]
    Auto,
    /// Right before the first section.
    Preamble,
    /// At the `toc::[]` block macro.
    Macro,
}

impl TocPlacement {
    /// Placement selected by the value of the `toc` document attribute.
    pub fn from_attribute(value: &str) -> Self {
        match value.trim() {
            "macro" => TocPlacement::Macro,
            "preamble" => TocPlacement::Preamble,
            _ => TocPlacement::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TocConfig {
    pub enabled: bool,
    pub placement: TocPlacement,
    pub levels: usize,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            placement: TocPlacement::Auto,
            levels: DEFAULT_TOC_LEVELS,
        }
    }
}

/// Resolution passes that can be switched off individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Passes {
    pub includes: bool,
    pub attributes: bool,
    pub references: bool,
}

impl Default for Passes {
    fn default() -> Self {
        Self {
            includes: true,
            attributes: true,
            references: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParseConfig {
    pub attributes: LinkedHashMap<String, String>,
    pub base_dir: PathBuf,
    pub max_include_depth: usize,
    /// Per-include fetch timeout, handed to resolvers that support one.
    pub include_timeout_ms: Option<u64>,
    pub toc: TocConfig,
    pub last_updated: Option<String>,
    pub source_name: Option<String>,
    pub passes: Passes,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            attributes: LinkedHashMap::new(),
            base_dir: PathBuf::from("."),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            include_timeout_ms: None,
            toc: TocConfig::default(),
            last_updated: None,
            source_name: None,
            passes: Passes::default(),
        }
    }
}

impl ParseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    pub fn with_include_timeout_ms(mut self, timeout: u64) -> Self {
        self.include_timeout_ms = Some(timeout);
        self
    }

    pub fn with_toc(mut self, placement: TocPlacement) -> Self {
        self.toc.enabled = true;
        self.toc.placement = placement;
        self
    }

    pub fn with_toc_levels(mut self, levels: usize) -> Self {
        self.toc.levels = levels;
        self
    }

    pub fn with_last_updated(mut self, timestamp: impl Into<String>) -> Self {
        self.last_updated = Some(timestamp.into());
        self
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn with_passes(mut self, passes: Passes) -> Self {
        self.passes = passes;
        self
    }

    /// Initial attributes as `(name, value, locked)`, `@` suffix stripped.
    pub fn initial_attributes(&self) -> impl Iterator<Item = (&str, &str, bool)> {
        self.attributes.iter().map(|(name, value)| match value.strip_suffix('@') {
            Some(soft) => (name.as_str(), soft, false),
            None => (name.as_str(), value.as_str(), true),
        })
    }

    /// Prefix of generated section ids.
    pub fn id_prefix(&self) -> &str {
        self.attribute_value("idprefix").unwrap_or("_")
    }

    /// Word separator of generated section ids.
    pub fn id_separator(&self) -> &str {
        self.attribute_value("idseparator").unwrap_or("_")
    }

    fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(|value| value.strip_suffix('@').unwrap_or(value))
    }
}
