//! Line Classification
//!
//! Pure, single-line classification. The block parser looks at the [`LineKind`] of the
//! line under its cursor (and at most one line ahead) to decide what to build; nothing here
//! consumes input or keeps state.
//!
//! Order matters: checks run in the order of [`classify_line`], so that e.g. `----` is a
//! fence and not a comment, and `[[id]]` is an anchor and not an attribute list.

use crate::adoc::ast::elements::{BulletStyle, CheckStyle, DelimitedKind, MAX_LIST_DEPTH};
use once_cell::sync::Lazy;
use regex::Regex;

static FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-{4,}|\.{4,}|={4,}|_{4,}|\*{4,}|\+{4,}|/{4,}|\|={3,}|--)$").unwrap()
});

static ATTRIBUTE_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^:(!?)([A-Za-z0-9_][A-Za-z0-9_-]*)(!?):(?:[ \t]+(.*))?$").unwrap()
});

static BLOCK_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\[([A-Za-z_:][\w:.-]*)(?:,[ \t]*(.+?))?\]\]$").unwrap());

static BLOCK_ATTRIBUTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\[\]].*)?\]$").unwrap());

static BLOCK_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.([^ \t.].*)$").unwrap());

pub(crate) static BLOCK_MACRO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z][a-z0-9_-]*)::(\S*?)\[(.*)\]$").unwrap());

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(={1,6})[ \t]+(\S.*)$").unwrap());

static LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[ \t]*(\*+|-|\.+|[0-9]+\.|[a-z]\.|[A-Z]\.|[ivxlcdm]+\)|[IVXLCDM]+\))[ \t]+(?:\[([ xX*])\][ \t]+)?(\S.*)$",
    )
    .unwrap()
});

/// Ordinal attached to an explicitly numbered marker (`3.` → 3).
pub type Ordinal = Option<u32>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace only.
    Blank,
    ListMarker {
        style: BulletStyle,
        check: CheckStyle,
        ordinal: Ordinal,
        /// The marker was deeper than the supported maximum and got folded.
        overflow: bool,
        /// Text after the marker (and checkbox).
        content: String,
    },
    /// A lone `+`.
    ListContinuation,
    Fence {
        delimiter: String,
        kind: DelimitedKind,
    },
    /// `:name: value`; `value` is `None` for `:name!:`.
    AttributeEntry {
        name: String,
        value: Option<String>,
    },
    /// `[[id]]` or `[[id,reftext]]`.
    BlockAnchor {
        id: String,
        reftext: Option<String>,
    },
    /// `[...]`, the raw text between the brackets.
    BlockAttributes(String),
    /// `.Title`
    BlockTitle(String),
    /// `= Title` is level 0, `== Title` level 1, and so on.
    Heading {
        level: usize,
        title: String,
    },
    /// `name::target[attrs]`
    BlockMacro {
        name: String,
        target: String,
        attributes: String,
    },
    /// `// ...`
    Comment,
    /// `'''`
    ThematicBreak,
    Text,
}

impl LineKind {
    pub fn is_blank(&self) -> bool {
        matches!(self, LineKind::Blank)
    }

    /// Lines that only decorate the next block.
    pub fn is_metadata(&self) -> bool {
        matches!(
            self,
            LineKind::BlockAnchor { .. } | LineKind::BlockAttributes(_) | LineKind::BlockTitle(_)
        )
    }
}

/// Classify one raw line (without its line terminator).
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim_end();
    if trimmed.trim_start().is_empty() {
        return LineKind::Blank;
    }
    if trimmed == "+" {
        return LineKind::ListContinuation;
    }
    if let Some(kind) = classify_fence(trimmed) {
        return kind;
    }
    if is_comment(trimmed) {
        return LineKind::Comment;
    }
    if let Some(caps) = ATTRIBUTE_ENTRY.captures(trimmed) {
        let unset = !caps[1].is_empty() || !caps[3].is_empty();
        let value = if unset {
            None
        } else {
            Some(caps.get(4).map(|m| m.as_str().trim().to_string()).unwrap_or_default())
        };
        return LineKind::AttributeEntry {
            name: caps[2].to_string(),
            value,
        };
    }
    if let Some(caps) = BLOCK_ANCHOR.captures(trimmed) {
        return LineKind::BlockAnchor {
            id: caps[1].to_string(),
            reftext: caps.get(2).map(|m| m.as_str().to_string()),
        };
    }
    if let Some(caps) = BLOCK_ATTRIBUTES.captures(trimmed) {
        return LineKind::BlockAttributes(
            caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
        );
    }
    if let Some(caps) = BLOCK_MACRO.captures(trimmed) {
        return LineKind::BlockMacro {
            name: caps[1].to_string(),
            target: caps[2].to_string(),
            attributes: caps[3].to_string(),
        };
    }
    if let Some(caps) = HEADING.captures(trimmed) {
        return LineKind::Heading {
            level: caps[1].len() - 1,
            title: caps[2].trim().to_string(),
        };
    }
    if let Some(kind) = classify_list_marker(trimmed) {
        return kind;
    }
    if trimmed == "'''" {
        return LineKind::ThematicBreak;
    }
    if let Some(caps) = BLOCK_TITLE.captures(trimmed) {
        return LineKind::BlockTitle(caps[1].to_string());
    }
    LineKind::Text
}

fn classify_fence(trimmed: &str) -> Option<LineKind> {
    if !FENCE.is_match(trimmed) {
        return None;
    }
    let kind = DelimitedKind::from_fence(trimmed)?;
    Some(LineKind::Fence {
        delimiter: trimmed.to_string(),
        kind,
    })
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with("//") && !trimmed.starts_with("///")
}

fn classify_list_marker(trimmed: &str) -> Option<LineKind> {
    let caps = LIST_MARKER.captures(trimmed)?;
    let marker = &caps[1];
    let (style, ordinal, overflow) = marker_style(marker)?;
    let check = match caps.get(2).map(|m| m.as_str()) {
        Some(" ") => CheckStyle::Unchecked,
        Some(_) => CheckStyle::Checked,
        None => CheckStyle::NoCheck,
    };
    // Checkboxes only mean something on unordered items.
    let (check, content) = if check != CheckStyle::NoCheck && style.is_ordered() {
        let checkbox = caps.get(2).map(|m| m.as_str()).unwrap_or(" ");
        (
            CheckStyle::NoCheck,
            format!("[{}] {}", checkbox, &caps[3]),
        )
    } else {
        (check, caps[3].to_string())
    };
    Some(LineKind::ListMarker {
        style,
        check,
        ordinal,
        overflow,
        content,
    })
}

fn marker_style(marker: &str) -> Option<(BulletStyle, Ordinal, bool)> {
    let count = marker.chars().count();
    if marker.chars().all(|c| c == '*') {
        return Some((BulletStyle::asterisks(count), None, count > MAX_LIST_DEPTH));
    }
    if marker == "-" {
        return Some((BulletStyle::Dash, None, false));
    }
    if marker.chars().all(|c| c == '.') {
        return Some((BulletStyle::dots(count), None, count > MAX_LIST_DEPTH));
    }
    if let Some(number) = marker.strip_suffix('.') {
        if let Ok(n) = number.parse::<u32>() {
            return Some((BulletStyle::Arabic, Some(n), false));
        }
        let c = number.chars().next()?;
        if c.is_ascii_lowercase() {
            return Some((BulletStyle::LowerAlpha, Some(u32::from(c as u8 - b'a') + 1), false));
        }
        if c.is_ascii_uppercase() {
            return Some((BulletStyle::UpperAlpha, Some(u32::from(c as u8 - b'A') + 1), false));
        }
        return None;
    }
    let numeral = marker.strip_suffix(')')?;
    if numeral.chars().all(|c| c.is_ascii_lowercase()) {
        Some((BulletStyle::LowerRoman, None, false))
    } else {
        Some((BulletStyle::UpperRoman, None, false))
    }
}
