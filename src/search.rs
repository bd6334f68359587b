//! Row matching for table filters.
//!
//! The default mode is a case-insensitive substring match against any cell.
//! Fuzzy matching is available as an opt-in from the config.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    Substring,
    Fuzzy,
}

/// A matcher for filtering text.
pub struct Matcher {
    mode: MatchMode,
    fuzzy: SkimMatcherV2,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MatchMode::default())
    }
}

impl Matcher {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            fuzzy: SkimMatcherV2::default().ignore_case(),
        }
    }

    pub const fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Check if `text` matches `pattern`. An empty pattern matches everything.
    pub fn matches(&self, text: &str, pattern: &str) -> bool {
        if pattern.is_empty() {
            return true;
        }
        match self.mode {
            MatchMode::Substring => text.to_lowercase().contains(&pattern.to_lowercase()),
            MatchMode::Fuzzy => self.fuzzy.fuzzy_match(text, pattern).is_some(),
        }
    }

    /// Check if any of the provided texts match the pattern.
    pub fn matches_any<'a>(&self, texts: impl IntoIterator<Item = &'a str>, pattern: &str) -> bool {
        texts.into_iter().any(|text| self.matches(text, pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match() {
        let matcher = Matcher::default();

        assert!(matcher.matches("web-prod-1", "prod"));
        assert!(matcher.matches("WEB-PROD-1", "prod"));
        assert!(matcher.matches("web-prod-1", "PROD"));
        assert!(matcher.matches("anything", ""));

        // Non-contiguous characters are not a substring
        assert!(!matcher.matches("web-prod-1", "wp1"));
    }

    #[test]
    fn test_fuzzy_match() {
        let matcher = Matcher::new(MatchMode::Fuzzy);

        assert!(matcher.matches("database-password", "dbpw"));
        assert!(matcher.matches("API-KEY", "apk"));
        assert!(!matcher.matches("hello", "xyz"));
    }

    #[test]
    fn test_matches_any() {
        let matcher = Matcher::default();

        let cells = ["i-0abc", "running", "eu-west-1"];
        assert!(matcher.matches_any(cells.iter().copied(), "RUN"));
        assert!(matcher.matches_any(cells.iter().copied(), "west"));
        assert!(!matcher.matches_any(cells.iter().copied(), "stopped"));
    }
}
