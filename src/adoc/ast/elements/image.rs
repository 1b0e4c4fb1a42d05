//! Image element
//!
//! The same [`ImageMacro`] payload backs both the block form (`image::path[]` alone on a
//! line) and the inline form (`image:path[]` inside text). When no alt text is given, the
//! alt defaults to the file's base name without extension: `images/foo.png` → `foo`.

use super::super::attributes::ElementAttributes;
use super::super::range::Range;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMacro {
    pub path: String,
    pub alt: String,
    pub width: Option<String>,
    pub height: Option<String>,
    /// Remaining attributes from the bracketed list (link, role, ...).
    pub attributes: ElementAttributes,
}

impl ImageMacro {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let alt = default_alt(&path);
        Self {
            path,
            alt,
            width: None,
            height: None,
            attributes: ElementAttributes::new(),
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        let alt = alt.into();
        if !alt.trim().is_empty() {
            self.alt = alt.trim().to_string();
        }
        self
    }

    pub fn with_size(mut self, width: Option<String>, height: Option<String>) -> Self {
        self.width = width.filter(|w| !w.is_empty());
        self.height = height.filter(|h| !h.is_empty());
        self
    }
}

/// Alt text derived from an image path: last path segment, extension stripped.
pub fn default_alt(path: &str) -> String {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => name[..dot].to_string(),
        _ => name.to_string(),
    }
}

/// A standalone image block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockImage {
    pub attributes: ElementAttributes,
    pub image: ImageMacro,
    pub location: Range,
}

impl BlockImage {
    pub fn new(image: ImageMacro) -> Self {
        Self {
            attributes: ElementAttributes::new(),
            image,
            location: Range::default(),
        }
    }

    /// Preferred builder
    pub fn at(mut self, location: Range) -> Self {
        self.location = location;
        self
    }
}
