//! Unified configuration for a logtally run.
//!
//! Configuration is grouped by the component that consumes it. Every section
//! has a `Default` carrying the command line defaults, so a partially written
//! YAML file only overrides the keys it names.
//!
//! # Examples
//!
//! ```rust
//! use logtally::AnalyzerConfig;
//!
//! let config = AnalyzerConfig::new()
//!     .with_patterns(vec![r"\.(jpe?g|png)".to_string()])
//!     .with_fields("7")
//!     .with_limit(10)
//!     .with_time_frequency(5);
//!
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{AnalyzerError, Result};
use crate::extract::FieldSelector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default regular expression used to split a line into fields.
pub const DEFAULT_DELIMITER: &str = r"\s+";

/// How lines are turned into keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Matchers, evaluated in this order. Empty means every line is its own key.
    pub patterns: Vec<String>,

    /// Lines matching this pattern are skipped and counted as rest.
    pub exclude: Option<String>,

    /// Match case-sensitively. Applies to matchers and the exclusion pattern.
    pub case_sensitive: bool,

    /// Count every non-overlapping occurrence instead of the first one.
    pub multi_match: bool,

    /// Comma separated, 1-based field numbers. Empty selects the whole line.
    pub fields: String,

    /// Regular expression separating fields.
    pub delimiter: String,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            exclude: None,
            case_sensitive: false,
            multi_match: false,
            fields: String::new(),
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

/// Conditions that end a run. Zero disables a limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Terminate once the table holds more distinct keys than this.
    ///
    /// This is the memory bound for high-cardinality input.
    pub max_keys: usize,

    /// Terminate after this many seconds.
    pub max_time: u64,

    /// Terminate after this many lines have been read.
    pub max_lines: u64,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_keys: 50_000,
            max_time: 0,
            max_lines: 0,
        }
    }
}

impl LimitConfig {
    pub fn max_time(&self) -> Option<Duration> {
        (self.max_time > 0).then(|| Duration::from_secs(self.max_time))
    }
}

/// Periodic report triggers. Zero disables a trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Report every N lines.
    pub line_frequency: u64,

    /// Report every T seconds.
    pub time_frequency: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            line_frequency: 0,
            time_frequency: 1,
        }
    }
}

/// Report layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Minimum width of the key column. Longer keys are never cut.
    pub width: usize,

    /// Rows printed before the rest is rolled into `<limited>`. Zero is unlimited.
    pub limit: usize,

    /// Percentages relative to total hits instead of total lines.
    pub relative: bool,

    /// Print the hits-per-second column.
    pub show_rate: bool,

    /// Clear the terminal before each report.
    pub clear_screen: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            width: 30,
            limit: 0,
            relative: false,
            show_rate: true,
            clear_screen: false,
        }
    }
}

/// Complete configuration of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    #[serde(rename = "match")]
    pub matching: MatchConfig,
    pub limits: LimitConfig,
    pub schedule: ScheduleConfig,
    pub report: ReportConfig,
}

impl AnalyzerConfig {
    /// Create a configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document. Missing sections and keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| AnalyzerError::ConfigFile(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&text)
    }

    /// Check the values that can be checked without compiling patterns.
    pub fn validate(&self) -> Result<()> {
        FieldSelector::parse(&self.matching.fields)?;

        if self.report.width == 0 {
            return Err(AnalyzerError::InvalidConfig(
                "key column width must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        self.matching.patterns = patterns;
        self
    }

    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.matching.exclude = Some(pattern.into());
        self
    }

    pub fn with_case_sensitive(mut self, enable: bool) -> Self {
        self.matching.case_sensitive = enable;
        self
    }

    pub fn with_multi_match(mut self, enable: bool) -> Self {
        self.matching.multi_match = enable;
        self
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.matching.fields = fields.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.matching.delimiter = delimiter.into();
        self
    }

    pub fn with_max_keys(mut self, max_keys: usize) -> Self {
        self.limits.max_keys = max_keys;
        self
    }

    pub fn with_max_time(mut self, seconds: u64) -> Self {
        self.limits.max_time = seconds;
        self
    }

    pub fn with_max_lines(mut self, lines: u64) -> Self {
        self.limits.max_lines = lines;
        self
    }

    pub fn with_line_frequency(mut self, lines: u64) -> Self {
        self.schedule.line_frequency = lines;
        self
    }

    pub fn with_time_frequency(mut self, seconds: u64) -> Self {
        self.schedule.time_frequency = seconds;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.report.width = width;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.report.limit = limit;
        self
    }

    pub fn with_relative(mut self, enable: bool) -> Self {
        self.report.relative = enable;
        self
    }

    pub fn with_rate(mut self, enable: bool) -> Self {
        self.report.show_rate = enable;
        self
    }

    pub fn with_clear_screen(mut self, enable: bool) -> Self {
        self.report.clear_screen = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert!(config.matching.patterns.is_empty());
        assert_eq!(config.matching.exclude, None);
        assert!(!config.matching.case_sensitive);
        assert!(!config.matching.multi_match);
        assert_eq!(config.matching.fields, "");
        assert_eq!(config.matching.delimiter, r"\s+");
        assert_eq!(config.limits.max_keys, 50_000);
        assert_eq!(config.limits.max_time, 0);
        assert_eq!(config.limits.max_lines, 0);
        assert_eq!(config.schedule.line_frequency, 0);
        assert_eq!(config.schedule.time_frequency, 1);
        assert_eq!(config.report.width, 30);
        assert_eq!(config.report.limit, 0);
        assert!(!config.report.relative);
        assert!(config.report.show_rate);
        assert!(!config.report.clear_screen);
    }

    #[test]
    fn test_builder_methods() {
        let config = AnalyzerConfig::new()
            .with_patterns(vec!["(GET|POST)".to_string()])
            .with_exclude("healthcheck")
            .with_case_sensitive(true)
            .with_multi_match(true)
            .with_fields("1,3")
            .with_delimiter(",")
            .with_max_keys(10)
            .with_max_time(60)
            .with_max_lines(1000)
            .with_line_frequency(100)
            .with_time_frequency(0)
            .with_width(20)
            .with_limit(5)
            .with_relative(true)
            .with_rate(false)
            .with_clear_screen(true);

        assert_eq!(config.matching.patterns, vec!["(GET|POST)".to_string()]);
        assert_eq!(config.matching.exclude.as_deref(), Some("healthcheck"));
        assert!(config.matching.case_sensitive);
        assert!(config.matching.multi_match);
        assert_eq!(config.matching.fields, "1,3");
        assert_eq!(config.matching.delimiter, ",");
        assert_eq!(config.limits.max_keys, 10);
        assert_eq!(config.limits.max_time(), Some(Duration::from_secs(60)));
        assert_eq!(config.limits.max_lines, 1000);
        assert_eq!(config.schedule.line_frequency, 100);
        assert_eq!(config.schedule.time_frequency, 0);
        assert_eq!(config.report.width, 20);
        assert_eq!(config.report.limit, 5);
        assert!(config.report.relative);
        assert!(!config.report.show_rate);
        assert!(config.report.clear_screen);
    }

    #[test]
    fn test_unlimited_time_is_none() {
        assert_eq!(LimitConfig::default().max_time(), None);
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let config = AnalyzerConfig::new().with_fields("1,x");
        assert!(matches!(
            config.validate(),
            Err(AnalyzerError::InvalidFieldSpec(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_width() {
        let config = AnalyzerConfig::new().with_width(0);
        assert!(matches!(
            config.validate(),
            Err(AnalyzerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AnalyzerConfig::from_yaml_str(
            r#"
match:
  patterns: ["(jpe?g)"]
  multi_match: true
report:
  limit: 3
"#,
        )
        .unwrap();

        assert_eq!(config.matching.patterns, vec!["(jpe?g)".to_string()]);
        assert!(config.matching.multi_match);
        assert_eq!(config.matching.delimiter, r"\s+");
        assert_eq!(config.report.limit, 3);
        assert_eq!(config.report.width, 30);
        assert_eq!(config.limits, LimitConfig::default());
        assert_eq!(config.schedule, ScheduleConfig::default());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = AnalyzerConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, AnalyzerConfig::default());
    }

    #[test]
    fn test_malformed_yaml() {
        let result = AnalyzerConfig::from_yaml_str("limits: [1, 2");
        assert!(matches!(result, Err(AnalyzerError::ConfigFile(_))));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limits:\n  max_lines: 42\nschedule:\n  line_frequency: 7").unwrap();

        let config = AnalyzerConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.limits.max_lines, 42);
        assert_eq!(config.schedule.line_frequency, 7);
        assert_eq!(config.schedule.time_frequency, 1);
    }

    #[test]
    fn test_missing_yaml_file() {
        let result = AnalyzerConfig::from_yaml_file("/nonexistent/logtally.yaml");
        match result {
            Err(AnalyzerError::ConfigFile(msg)) => assert!(msg.contains("logtally.yaml")),
            other => panic!("Expected ConfigFile error, got {other:?}"),
        }
    }
}
