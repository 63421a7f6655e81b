//! Command line surface.
//!
//! Every option is optional so that it only overrides what it names: values
//! come from the defaults, then `--config`, then the command line.

use crate::config::AnalyzerConfig;
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logtally",
    version,
    about = "Classify lines from stdin and keep a ranked report of hit counts",
    after_help = "\
Exit status:
  0  input ended, a limit was reached or the run was interrupted
  1  no input was received, or reading the input failed
  2  invalid options or patterns

Example: tail -f access.log | logtally -f 7 '\\.(jpe?g|png|gif)$'"
)]
pub struct Cli {
    /// Regular expressions to match; the first capture group becomes the key
    pub patterns: Vec<String>,

    /// YAML file with default settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma separated field numbers to use instead of the whole line
    #[arg(short = 'f', long, value_name = "LIST")]
    pub fields: Option<String>,

    /// Regular expression separating fields
    #[arg(short = 'd', long, value_name = "REGEX")]
    pub delimiter: Option<String>,

    /// Skip lines matching this regular expression
    #[arg(short = 'e', long, value_name = "REGEX")]
    pub exclude: Option<String>,

    /// Match case-sensitively
    #[arg(short = 'c', long)]
    pub case_sensitive: bool,

    /// Count every match on a line, not just the first per pattern
    #[arg(short = 'm', long)]
    pub multi_match: bool,

    /// Show percentages of total hits instead of total lines
    #[arg(short = 'r', long)]
    pub relative: bool,

    /// Width of the key column
    #[arg(short = 'w', long, value_name = "N")]
    pub width: Option<usize>,

    /// Show at most N keys; the rest are summed into <limited>
    #[arg(short = 'l', long, value_name = "N")]
    pub limit: Option<usize>,

    /// Stop after this many distinct keys (0 = unlimited)
    #[arg(long, value_name = "N")]
    pub max_keys: Option<usize>,

    /// Stop after this many seconds (0 = unlimited)
    #[arg(long, value_name = "SECS")]
    pub max_time: Option<u64>,

    /// Stop once more than this many lines were read (0 = unlimited)
    #[arg(long, value_name = "N")]
    pub max_lines: Option<u64>,

    /// Print a report every N lines (0 = never)
    #[arg(long, value_name = "N")]
    pub report_lines: Option<u64>,

    /// Print a report every SECS seconds (0 = never)
    #[arg(long, value_name = "SECS")]
    pub report_secs: Option<u64>,

    /// Hide the hits per second column
    #[arg(long)]
    pub no_rate: bool,

    /// Clear the screen before each report
    #[arg(long)]
    pub clear: bool,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Resolve the effective configuration.
    pub fn to_config(&self) -> Result<AnalyzerConfig> {
        let base = match &self.config {
            Some(path) => AnalyzerConfig::from_yaml_file(path)?,
            None => AnalyzerConfig::default(),
        };
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }

    /// Overlay the options given on the command line onto `config`.
    pub fn apply(&self, mut config: AnalyzerConfig) -> AnalyzerConfig {
        let matching = &mut config.matching;
        if !self.patterns.is_empty() {
            matching.patterns = self.patterns.clone();
        }
        if let Some(fields) = &self.fields {
            matching.fields = fields.clone();
        }
        if let Some(delimiter) = &self.delimiter {
            matching.delimiter = delimiter.clone();
        }
        if let Some(exclude) = &self.exclude {
            matching.exclude = Some(exclude.clone());
        }
        matching.case_sensitive |= self.case_sensitive;
        matching.multi_match |= self.multi_match;

        let limits = &mut config.limits;
        if let Some(max_keys) = self.max_keys {
            limits.max_keys = max_keys;
        }
        if let Some(max_time) = self.max_time {
            limits.max_time = max_time;
        }
        if let Some(max_lines) = self.max_lines {
            limits.max_lines = max_lines;
        }

        if let Some(lines) = self.report_lines {
            config.schedule.line_frequency = lines;
        }
        if let Some(secs) = self.report_secs {
            config.schedule.time_frequency = secs;
        }

        let report = &mut config.report;
        if let Some(width) = self.width {
            report.width = width;
        }
        if let Some(limit) = self.limit {
            report.limit = limit;
        }
        report.relative |= self.relative;
        report.clear_screen |= self.clear;
        if self.no_rate {
            report.show_rate = false;
        }

        config
    }
}
