//! # logtally
//!
//! A streaming line classifier. Lines are read from a source (normally
//! stdin), optionally narrowed to a few fields, matched against a list of
//! regular expressions and counted per key. A ranked report of the counts is
//! printed periodically and once more when the run ends.
//!
//! ## Quick Start
//!
//! ### Count image types in an access log
//!
//! ```rust
//! use logtally::{AnalyzerConfig, Engine, Interrupt, IterSource};
//!
//! let config = AnalyzerConfig::new()
//!     .with_patterns(vec![r"\.(jpe?g|png)\b".to_string()])
//!     .with_time_frequency(0);
//!
//! let lines = [
//!     "GET /a.jpg HTTP/1.1",
//!     "GET /b.png HTTP/1.1",
//!     "GET /index.html HTTP/1.1",
//! ];
//! let finished = Engine::new(&config, Vec::new())?
//!     .run(&mut IterSource::new(lines), &Interrupt::new())?;
//!
//! assert_eq!(finished.state.table.get("jpg"), Some(1));
//! assert_eq!(finished.state.counters.rest, 1);
//! # Ok::<(), logtally::AnalyzerError>(())
//! ```
//!
//! ### Classify without running the engine
//!
//! ```rust
//! use logtally::matcher::{Classification, MatchKey, PatternMatcher};
//!
//! let matcher = PatternMatcher::new(&["(GET|POST)".to_string()], Some("health"), false, true)?;
//! assert_eq!(matcher.classify("GET /health"), Classification::Excluded);
//! assert_eq!(
//!     matcher.classify("get /a, post /b"),
//!     Classification::Hits(vec![MatchKey::Captured("get"), MatchKey::Captured("post")])
//! );
//! # Ok::<(), logtally::AnalyzerError>(())
//! ```

pub mod cli;
pub mod config;
pub mod counters;
pub mod engine;
pub mod error;
pub mod extract;
pub mod logging;
pub mod matcher;
pub mod report;
pub mod scheduler;
pub mod source;
pub mod table;

// Primary engine interface
pub use engine::{Engine, Finished, Interrupt, RunState, RunSummary, Termination};

// Configuration
pub use config::{AnalyzerConfig, LimitConfig, MatchConfig, ReportConfig, ScheduleConfig};

// Core types and errors
pub use counters::RunCounters;
pub use error::{AnalyzerError, Result};
pub use table::FrequencyTable;

// Pipeline stages
pub use extract::{FieldSelector, KeyExtractor};
pub use matcher::{Classification, MatchKey, PatternMatcher};
pub use report::{ReportRenderer, ReportView};
pub use scheduler::{Fired, LineTrigger, Scheduler, TimeTrigger};
pub use source::{IterSource, LineEvent, LineSource, ReaderSource};
