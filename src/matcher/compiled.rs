//! A user pattern compiled once for the whole run.

use super::types::MatchKey;
use crate::error::{AnalyzerError, Result};
use regex::{Captures, Regex, RegexBuilder};

/// Compiled matcher together with the text it was written as.
///
/// The source text doubles as the key for hits that do not capture anything,
/// so it is kept verbatim.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
    has_capture: bool,
}

impl CompiledPattern {
    /// Compile `pattern`. Matching is case-insensitive unless `case_sensitive`.
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| AnalyzerError::invalid_regex(pattern, &e))?;

        // captures_len counts the implicit whole-match group
        let has_capture = regex.captures_len() > 1;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            has_capture,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn has_capture(&self) -> bool {
        self.has_capture
    }

    pub fn is_match(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }

    /// Key of the first match in `subject`, if any.
    pub fn first<'a>(&'a self, subject: &'a str) -> Option<MatchKey<'a>> {
        if !self.has_capture {
            return self
                .regex
                .is_match(subject)
                .then_some(MatchKey::Pattern(&self.source));
        }
        self.regex.captures(subject).map(|caps| self.key_for(&caps))
    }

    /// Keys of every non-overlapping match in `subject`, appended to `out`.
    pub fn all<'a>(&'a self, subject: &'a str, out: &mut Vec<MatchKey<'a>>) {
        if !self.has_capture {
            let hits = self.regex.find_iter(subject).count();
            out.extend(std::iter::repeat(MatchKey::Pattern(&self.source)).take(hits));
            return;
        }
        out.extend(
            self.regex
                .captures_iter(subject)
                .map(|caps| self.key_for(&caps)),
        );
    }

    fn key_for<'a>(&'a self, caps: &Captures<'a>) -> MatchKey<'a> {
        match caps.get(1) {
            Some(m) if !m.as_str().is_empty() => MatchKey::Captured(m.as_str()),
            _ => MatchKey::Pattern(&self.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_detection() {
        assert!(CompiledPattern::new("(jpe?g)", false).unwrap().has_capture());
        assert!(!CompiledPattern::new("jpe?g", false).unwrap().has_capture());
        assert!(!CompiledPattern::new("(?:jpe?g)", false).unwrap().has_capture());
    }

    #[test]
    fn test_first_uses_capture() {
        let pattern = CompiledPattern::new(r"\.(jpe?g)$", false).unwrap();
        assert_eq!(pattern.first("a.JPG"), Some(MatchKey::Captured("JPG")));
        assert_eq!(pattern.first("a.png"), None);
    }

    #[test]
    fn test_first_without_capture_uses_source() {
        let pattern = CompiledPattern::new(r"\.png$", false).unwrap();
        assert_eq!(pattern.first("b.png"), Some(MatchKey::Pattern(r"\.png$")));
    }

    #[test]
    fn test_case_sensitive() {
        let pattern = CompiledPattern::new("(jpg)", true).unwrap();
        assert_eq!(pattern.first("a.JPG"), None);
        assert_eq!(pattern.first("a.jpg"), Some(MatchKey::Captured("jpg")));
    }

    #[test]
    fn test_empty_or_missing_capture_falls_back() {
        let optional = CompiledPattern::new("x(y)?", false).unwrap();
        assert_eq!(optional.first("x"), Some(MatchKey::Pattern("x(y)?")));

        let empty = CompiledPattern::new("a(b*)c", false).unwrap();
        assert_eq!(empty.first("ac"), Some(MatchKey::Pattern("a(b*)c")));
    }

    #[test]
    fn test_zero_capture_is_a_key() {
        let pattern = CompiledPattern::new(r"code=(\d)", false).unwrap();
        assert_eq!(pattern.first("code=0"), Some(MatchKey::Captured("0")));
    }

    #[test]
    fn test_all_matches() {
        let pattern = CompiledPattern::new(r"(\d+)", false).unwrap();
        let mut out = Vec::new();
        pattern.all("1 22 1", &mut out);
        assert_eq!(
            out,
            vec![
                MatchKey::Captured("1"),
                MatchKey::Captured("22"),
                MatchKey::Captured("1")
            ]
        );
    }

    #[test]
    fn test_all_without_capture() {
        let pattern = CompiledPattern::new("ab", false).unwrap();
        let mut out = Vec::new();
        pattern.all("abABxab", &mut out);
        assert_eq!(out, vec![MatchKey::Pattern("ab"); 3]);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = CompiledPattern::new("(", false);
        match result {
            Err(AnalyzerError::InvalidRegex { pattern, .. }) => assert_eq!(pattern, "("),
            other => panic!("Expected InvalidRegex, got {other:?}"),
        }
    }
}
