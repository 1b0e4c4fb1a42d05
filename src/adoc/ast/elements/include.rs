//! Include directive
//!
//! `include::target[lines=1..5, leveloffset=+1, opts=optional]` stays in the draft tree as
//! an [`IncludeMacro`]; the include expansion stage replaces it with the parsed content of
//! the target, or with an [`IncludeError`] marker when the target cannot be fetched.

use super::super::attributes::ElementAttributes;
use super::super::range::Range;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncludeMacro {
    pub target: String,
    pub attributes: ElementAttributes,
    pub location: Range,
}

impl IncludeMacro {
    pub fn is_optional(&self) -> bool {
        self.attributes.has_option("optional")
            || self
                .attributes
                .get("opts")
                .map(|opts| opts.split(',').any(|o| o.trim() == "optional"))
                .unwrap_or(false)
    }

    /// `leveloffset` as a signed delta. Absolute values are returned as-is.
    pub fn level_offset(&self) -> Option<LevelOffset> {
        let raw = self.attributes.get("leveloffset")?.trim();
        if let Some(delta) = raw.strip_prefix('+') {
            delta.parse().ok().map(LevelOffset::Relative)
        } else if raw.starts_with('-') {
            raw.parse().ok().map(LevelOffset::Relative)
        } else {
            raw.parse().ok().map(LevelOffset::Absolute)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOffset {
    Relative(i64),
    Absolute(i64),
}

/// Placeholder left where an include could not be expanded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncludeError {
    pub target: String,
    pub message: String,
    pub location: Range,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn include(attrs: &[(&str, &str)]) -> IncludeMacro {
        IncludeMacro {
            target: "chapter.adoc".into(),
            attributes: attrs.iter().copied().collect(),
            location: Range::default(),
        }
    }

    #[test]
    fn test_level_offset() {
        assert_eq!(
            include(&[("leveloffset", "+1")]).level_offset(),
            Some(LevelOffset::Relative(1))
        );
        assert_eq!(
            include(&[("leveloffset", "-1")]).level_offset(),
            Some(LevelOffset::Relative(-1))
        );
        assert_eq!(
            include(&[("leveloffset", "2")]).level_offset(),
            Some(LevelOffset::Absolute(2))
        );
        assert_eq!(include(&[]).level_offset(), None);
    }

    #[test]
    fn test_optional() {
        assert!(include(&[("opts", "optional")]).is_optional());
        assert!(!include(&[("opts", "other")]).is_optional());
    }
}
