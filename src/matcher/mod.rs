//! Line classification against the configured matchers.
//!
//! ## Rules
//!
//! - The exclusion pattern is checked first. A subject that matches it is
//!   [`Classification::Excluded`] and no matcher is evaluated.
//! - With no matchers the subject itself is the single key.
//! - Otherwise every matcher is tried in order and each one contributes
//!   independently: once in single-match mode, once per non-overlapping
//!   occurrence in multi-match mode.
//! - A hit's key is the first capturing group when it captured non-empty
//!   text, and the matcher's pattern text otherwise.
//!
//! ## Example Usage
//!
//! ```rust
//! use logtally::matcher::{Classification, MatchKey, PatternMatcher};
//!
//! let matcher = PatternMatcher::new(&["(jpe?g)".to_string()], None, false, false)?;
//! assert_eq!(
//!     matcher.classify("a.JPEG"),
//!     Classification::Hits(vec![MatchKey::Captured("JPEG")])
//! );
//! # Ok::<(), logtally::AnalyzerError>(())
//! ```

pub mod compiled;
pub mod types;

pub use compiled::CompiledPattern;
pub use types::{Classification, MatchKey};

use crate::config::MatchConfig;
use crate::error::Result;

/// The immutable matcher set for a run.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Vec<CompiledPattern>,
    exclude: Option<CompiledPattern>,
    multi_match: bool,
}

impl PatternMatcher {
    /// Compile all patterns up front so a bad one fails the run before any
    /// input is read.
    pub fn new(
        patterns: &[String],
        exclude: Option<&str>,
        case_sensitive: bool,
        multi_match: bool,
    ) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| CompiledPattern::new(p, case_sensitive))
            .collect::<Result<Vec<_>>>()?;
        let exclude = exclude
            .map(|p| CompiledPattern::new(p, case_sensitive))
            .transpose()?;

        Ok(Self {
            patterns,
            exclude,
            multi_match,
        })
    }

    pub fn from_config(config: &MatchConfig) -> Result<Self> {
        Self::new(
            &config.patterns,
            config.exclude.as_deref(),
            config.case_sensitive,
            config.multi_match,
        )
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn has_exclusion(&self) -> bool {
        self.exclude.is_some()
    }

    pub fn is_excluded(&self, subject: &str) -> bool {
        self.exclude.as_ref().is_some_and(|p| p.is_match(subject))
    }

    /// Classify one subject. See the module docs for the rules.
    pub fn classify<'a>(&'a self, subject: &'a str) -> Classification<'a> {
        if self.is_excluded(subject) {
            return Classification::Excluded;
        }

        if self.patterns.is_empty() {
            return Classification::Hits(vec![MatchKey::Subject(subject)]);
        }

        let mut keys = Vec::new();
        for pattern in &self.patterns {
            if self.multi_match {
                pattern.all(subject, &mut keys);
            } else if let Some(key) = pattern.first(subject) {
                keys.push(key);
            }
        }
        Classification::Hits(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;

    fn matcher(patterns: &[&str], exclude: Option<&str>, multi: bool) -> PatternMatcher {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        PatternMatcher::new(&patterns, exclude, false, multi).unwrap()
    }

    #[test]
    fn test_no_patterns_subject_is_key() {
        let m = matcher(&[], None, false);
        assert_eq!(
            m.classify("GET /a 200"),
            Classification::Hits(vec![MatchKey::Subject("GET /a 200")])
        );
    }

    #[test]
    fn test_single_match_per_matcher() {
        let m = matcher(&["(a)"], None, false);
        assert_eq!(
            m.classify("aaa"),
            Classification::Hits(vec![MatchKey::Captured("a")])
        );
    }

    #[test]
    fn test_multi_match_counts_each_occurrence() {
        let m = matcher(&["(a)"], None, true);
        assert_eq!(m.classify("aaa").hit_count(), 3);
    }

    #[test]
    fn test_every_matcher_contributes() {
        let m = matcher(&["(GET|POST)", r"\s(\d{3})$", "missing"], None, false);
        assert_eq!(
            m.classify("GET /a 404"),
            Classification::Hits(vec![MatchKey::Captured("GET"), MatchKey::Captured("404")])
        );
    }

    #[test]
    fn test_no_hit_is_rest() {
        let m = matcher(&["(jpe?g)"], None, false);
        let result = m.classify("b.png");
        assert!(result.is_rest());
        assert_eq!(result, Classification::Hits(vec![]));
    }

    #[test]
    fn test_exclusion_wins() {
        let m = matcher(&["(jpe?g)"], Some("gift"), false);
        assert_eq!(m.classify("x.jpeg GIFT"), Classification::Excluded);
        assert_eq!(
            m.classify("x.jpeg"),
            Classification::Hits(vec![MatchKey::Captured("jpeg")])
        );
    }

    #[test]
    fn test_exclusion_without_matchers() {
        let m = matcher(&[], Some("^#"), false);
        assert_eq!(m.classify("# comment"), Classification::Excluded);
        assert!(!m.classify("line").is_rest());
    }

    #[test]
    fn test_exclusion_respects_case_sensitivity() {
        let m = PatternMatcher::new(&[], Some("gift"), true, false).unwrap();
        assert!(!m.is_excluded("GIFT"));
        assert!(m.is_excluded("gift"));
    }

    #[test]
    fn test_from_config() {
        let config = MatchConfig {
            patterns: vec!["(x)".to_string(), "y".to_string()],
            exclude: Some("z".to_string()),
            ..MatchConfig::default()
        };
        let m = PatternMatcher::from_config(&config).unwrap();
        assert_eq!(m.pattern_count(), 2);
        assert!(m.has_exclusion());
    }

    #[test]
    fn test_bad_exclusion_fails_early() {
        let result = PatternMatcher::new(&[], Some("(?"), false, false);
        assert!(matches!(result, Err(AnalyzerError::InvalidRegex { .. })));
    }
}
