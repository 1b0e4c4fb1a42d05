//! List element
//!
//!     A list owns its items; an item owns whatever hangs below it: its leading paragraph,
//!     nested lists and blocks attached through continuations.
//!
//!     The bullet style decides nesting. Unordered styles are `*` to `*****` and `-`;
//!     ordered styles are `.` to `.....` plus the explicit numbering kinds (`1.`, `a.`,
//!     `A.`, `i)`, `I)`). Items sharing a (list, level) share one style.
//!
//!     Examples:
//!         * level 1
//!         ** level 2
//!         +
//!         ----
//!         attached to the level 2 item
//!         ----

use super::super::attributes::ElementAttributes;
use super::super::range::Range;
use super::Block;
use serde::Serialize;
use std::fmt;

/// Deepest supported nesting.
pub const MAX_LIST_DEPTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BulletStyle {
    OneAsterisk,
    TwoAsterisks,
    ThreeAsterisks,
    FourAsterisks,
    FiveAsterisks,
    Dash,
    OneDot,
    TwoDots,
    ThreeDots,
    FourDots,
    FiveDots,
    Arabic,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
}

impl BulletStyle {
    pub fn asterisks(count: usize) -> Self {
        match count {
            0 | 1 => BulletStyle::OneAsterisk,
            2 => BulletStyle::TwoAsterisks,
            3 => BulletStyle::ThreeAsterisks,
            4 => BulletStyle::FourAsterisks,
            _ => BulletStyle::FiveAsterisks,
        }
    }

    pub fn dots(count: usize) -> Self {
        match count {
            0 | 1 => BulletStyle::OneDot,
            2 => BulletStyle::TwoDots,
            3 => BulletStyle::ThreeDots,
            4 => BulletStyle::FourDots,
            _ => BulletStyle::FiveDots,
        }
    }

    pub fn is_ordered(self) -> bool {
        !matches!(
            self,
            BulletStyle::OneAsterisk
                | BulletStyle::TwoAsterisks
                | BulletStyle::ThreeAsterisks
                | BulletStyle::FourAsterisks
                | BulletStyle::FiveAsterisks
                | BulletStyle::Dash
        )
    }

    /// Marker text for the item at `ordinal` (1-based) in canonical markup.
    pub fn marker(self, ordinal: usize) -> String {
        match self {
            BulletStyle::OneAsterisk => "*".into(),
            BulletStyle::TwoAsterisks => "**".into(),
            BulletStyle::ThreeAsterisks => "***".into(),
            BulletStyle::FourAsterisks => "****".into(),
            BulletStyle::FiveAsterisks => "*****".into(),
            BulletStyle::Dash => "-".into(),
            BulletStyle::OneDot => ".".into(),
            BulletStyle::TwoDots => "..".into(),
            BulletStyle::ThreeDots => "...".into(),
            BulletStyle::FourDots => "....".into(),
            BulletStyle::FiveDots => ".....".into(),
            BulletStyle::Arabic => format!("{}.", ordinal),
            BulletStyle::LowerAlpha => format!("{}.", alpha(ordinal)),
            BulletStyle::UpperAlpha => format!("{}.", alpha(ordinal).to_ascii_uppercase()),
            BulletStyle::LowerRoman => format!("{})", roman(ordinal)),
            BulletStyle::UpperRoman => format!("{})", roman(ordinal).to_ascii_uppercase()),
        }
    }
}

impl fmt::Display for BulletStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

fn alpha(ordinal: usize) -> char {
    let index = (ordinal.max(1) - 1) % 26;
    (b'a' + index as u8) as char
}

fn roman(mut ordinal: usize) -> String {
    const NUMERALS: [(usize, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while ordinal >= value {
            out.push_str(numeral);
            ordinal -= value;
        }
    }
    if out.is_empty() {
        out.push('i');
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CheckStyle {
    #[default]
    NoCheck,
    Unchecked,
    Checked,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub attributes: ElementAttributes,
    pub items: Vec<ListItem>,
    pub location: Range,
}

impl List {
    pub fn new(items: Vec<ListItem>) -> Self {
        Self {
            attributes: ElementAttributes::new(),
            items,
            location: Range::default(),
        }
    }

    /// Preferred builder
    pub fn at(mut self, location: Range) -> Self {
        self.location = location;
        self
    }

    pub fn is_ordered(&self) -> bool {
        self.items
            .first()
            .map(|item| item.bullet_style.is_ordered())
            .unwrap_or(false)
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "List({} items)", self.items.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    /// 1-based nesting depth.
    pub level: usize,
    pub bullet_style: BulletStyle,
    pub check_style: CheckStyle,
    pub attributes: ElementAttributes,
    pub elements: Vec<Block>,
    pub location: Range,
}

impl ListItem {
    pub fn new(level: usize, bullet_style: BulletStyle) -> Self {
        Self {
            level,
            bullet_style,
            check_style: CheckStyle::NoCheck,
            attributes: ElementAttributes::new(),
            elements: Vec::new(),
            location: Range::default(),
        }
    }

    /// Preferred builder
    pub fn at(mut self, location: Range) -> Self {
        self.location = location;
        self
    }

    pub fn with_check(mut self, check_style: CheckStyle) -> Self {
        self.check_style = check_style;
        self
    }

    /// Nested lists directly below this item.
    pub fn sublists(&self) -> impl Iterator<Item = &List> {
        self.elements.iter().filter_map(|block| match block {
            Block::List(list) => Some(list),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        assert_eq!(BulletStyle::ThreeAsterisks.marker(1), "***");
        assert_eq!(BulletStyle::Arabic.marker(3), "3.");
        assert_eq!(BulletStyle::LowerAlpha.marker(2), "b.");
        assert_eq!(BulletStyle::UpperAlpha.marker(1), "A.");
        assert_eq!(BulletStyle::LowerRoman.marker(4), "iv)");
        assert_eq!(BulletStyle::UpperRoman.marker(9), "IX)");
    }

    #[test]
    fn test_asterisk_count_is_capped() {
        assert_eq!(BulletStyle::asterisks(7), BulletStyle::FiveAsterisks);
        assert_eq!(BulletStyle::dots(2), BulletStyle::TwoDots);
    }

    #[test]
    fn test_ordered_styles() {
        assert!(BulletStyle::OneDot.is_ordered());
        assert!(BulletStyle::UpperRoman.is_ordered());
        assert!(!BulletStyle::Dash.is_ordered());
    }
}
