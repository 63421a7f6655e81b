//! Ranked frequency report.
//!
//! A report is a pure function of a [`ReportView`] and the report options:
//! rendering the same view twice yields byte-identical text.
//!
//! ```text
//! GET                              66.67%       2.00/s          2 of 3
//! POST                             33.33%       1.00/s          1 of 3
//! <total>                         100.00%       3.00/s          3 of 3
//!
//! ```

use crate::config::ReportConfig;
use crate::counters::per_second;
use indexmap::IndexMap;
use std::io::{self, Write};
use std::time::Duration;

/// Moves the cursor home and clears the terminal.
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

pub const LIMITED_KEY: &str = "<limited>";
pub const TOTAL_KEY: &str = "<total>";
pub const REST_KEY: &str = "<rest>";

/// Read-only point-in-time view of the run state.
#[derive(Debug, Clone, Copy)]
pub struct ReportView<'a> {
    /// Table entries in first-seen order.
    pub entries: &'a IndexMap<String, u64>,
    pub lines: u64,
    pub hits: u64,
    pub rest: u64,
    pub elapsed: Duration,
}

impl<'a> ReportView<'a> {
    /// Denominator for percentages.
    pub fn divider(&self, relative: bool) -> u64 {
        if relative {
            self.hits
        } else {
            self.lines
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    options: ReportConfig,
}

impl ReportRenderer {
    pub fn new(options: ReportConfig) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportConfig {
        &self.options
    }

    /// Render the report block, including its trailing blank line.
    pub fn render(&self, view: &ReportView<'_>) -> String {
        let mut ranked: Vec<(&String, u64)> = view
            .entries
            .iter()
            .map(|(key, count)| (key, *count))
            .collect();
        // stable: equal counts keep first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let divider = view.divider(self.options.relative);
        let shown = match self.options.limit {
            0 => ranked.len(),
            limit => limit.min(ranked.len()),
        };

        let mut out = String::new();
        for (key, count) in &ranked[..shown] {
            out.push_str(&self.row(key, *count, divider, view, ""));
        }

        let hidden = &ranked[shown..];
        if !hidden.is_empty() {
            let summed: u64 = hidden.iter().map(|(_, count)| count).sum();
            let suffix = format!(" ({} keys)", hidden.len());
            out.push_str(&self.row(LIMITED_KEY, summed, divider, view, &suffix));
        }

        out.push_str(&self.row(TOTAL_KEY, view.hits, divider, view, ""));
        if view.rest > 0 {
            out.push_str(&self.row(REST_KEY, view.rest, divider, view, ""));
        }

        out.push('\n');
        out
    }

    /// Render into `out`, clearing the screen first when configured.
    pub fn render_to<W: Write>(&self, view: &ReportView<'_>, out: &mut W) -> io::Result<()> {
        if self.options.clear_screen {
            out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        out.write_all(self.render(view).as_bytes())?;
        out.flush()
    }

    /// One report line, terminator included.
    fn row(
        &self,
        key: &str,
        count: u64,
        divider: u64,
        view: &ReportView<'_>,
        suffix: &str,
    ) -> String {
        let width = self.options.width;
        let percent = percentage(count, divider);
        let rate = if self.options.show_rate {
            let rate = format_rate(per_second(count, view.elapsed));
            format!(" {rate:>10}/s")
        } else {
            String::new()
        };
        format!(
            "{key:<width$} {percent:>7.2}%{rate} {count:>10} of {}{suffix}\n",
            view.lines
        )
    }
}

/// `count` as a percentage of `divider`; 0 when there is nothing to divide by.
pub fn percentage(count: u64, divider: u64) -> f64 {
    if divider == 0 {
        return 0.0;
    }
    count as f64 / divider as f64 * 100.0
}

/// Two decimals, or `-` for an undefined rate.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{rate:.2}"),
        None => "-".to_string(),
    }
}
