//! Text matching utilities for tree assertions

/// Text matching strategies for assertions
#[derive(Debug, Clone)]
pub enum TextMatch {
    /// Exact text match
    Exact(String),
    /// Text starts with prefix
    StartsWith(String),
    /// Text contains substring
    Contains(String),
}

impl TextMatch {
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => actual == expected,
            TextMatch::StartsWith(prefix) => actual.starts_with(prefix),
            TextMatch::Contains(substring) => actual.contains(substring),
        }
    }

    /// Assert that the actual text matches this pattern
    pub fn assert(&self, actual: &str, context: &str) {
        assert!(
            self.matches(actual),
            "{}: Expected text {}, but got '{}'",
            context,
            self.describe(),
            actual
        );
    }

    fn describe(&self) -> String {
        match self {
            TextMatch::Exact(expected) => format!("to be '{}'", expected),
            TextMatch::StartsWith(prefix) => format!("to start with '{}'", prefix),
            TextMatch::Contains(substring) => format!("to contain '{}'", substring),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching() {
        assert!(TextMatch::Exact("a b".into()).matches("a b"));
        assert!(TextMatch::StartsWith("a".into()).matches("a b"));
        assert!(TextMatch::Contains(" b".into()).matches("a b"));
        assert!(!TextMatch::Exact("a".into()).matches("a b"));
    }

    #[test]
    #[should_panic(expected = "item: Expected text to be 'x'")]
    fn test_assert_reports_context() {
        TextMatch::Exact("x".into()).assert("y", "item");
    }
}
