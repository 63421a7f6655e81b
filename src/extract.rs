//! Subject extraction: the part of a line that matchers and keys see.
//!
//! With no field selector the subject is the line itself. Otherwise the line
//! is split on the delimiter pattern and the selected fields are joined with
//! single spaces, in the order they were selected.

use crate::error::{AnalyzerError, Result};
use regex::Regex;
use std::borrow::Cow;

/// Parsed list of 1-based field numbers, e.g. `"2,1"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelector {
    fields: Vec<usize>,
}

impl FieldSelector {
    /// Parse a comma separated field list. Whitespace around numbers is allowed.
    ///
    /// An empty string selects the whole line. Zero and non-numeric entries
    /// are rejected.
    pub fn parse(list: &str) -> Result<Self> {
        if list.trim().is_empty() {
            return Ok(Self::default());
        }

        let fields = list
            .split(',')
            .map(|part| {
                let part = part.trim();
                match part.parse::<usize>() {
                    Ok(0) => Err(AnalyzerError::InvalidFieldSpec(
                        "field numbers start at 1".to_string(),
                    )),
                    Ok(n) => Ok(n),
                    Err(_) => Err(AnalyzerError::InvalidFieldSpec(format!(
                        "'{part}' is not a field number"
                    ))),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { fields })
    }

    pub fn is_whole_line(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[usize] {
        &self.fields
    }
}

/// Splits lines into fields and assembles the selected subject.
#[derive(Debug, Clone)]
pub struct KeyExtractor {
    selector: FieldSelector,
    delimiter: Regex,
}

impl KeyExtractor {
    pub fn new(selector: FieldSelector, delimiter: &str) -> Result<Self> {
        let delimiter =
            Regex::new(delimiter).map_err(|e| AnalyzerError::invalid_regex(delimiter, &e))?;
        Ok(Self {
            selector,
            delimiter,
        })
    }

    /// Return the subject text for `line`.
    ///
    /// Never fails: a field number past the end of the line contributes an
    /// empty string at its position.
    pub fn extract_subject<'a>(&self, line: &'a str) -> Cow<'a, str> {
        if self.selector.is_whole_line() {
            return Cow::Borrowed(line);
        }

        let parts: Vec<&str> = self.delimiter.split(line).collect();
        let selected: Vec<&str> = self
            .selector
            .fields()
            .iter()
            .map(|&n| parts.get(n - 1).copied().unwrap_or(""))
            .collect();

        Cow::Owned(selected.join(" "))
    }
}
