//! The streaming aggregation engine.
//!
//! The [`Engine`] owns all mutable run state and is its only writer. One
//! iteration of [`Engine::run`]:
//!
//! 1. check the termination conditions (max keys, max time, max lines,
//!    interrupt);
//! 2. wait for the next line;
//! 3. strip the terminator, extract the subject, classify and count it;
//! 4. let the scheduler decide whether to print reports.
//!
//! Every way out of the loop except "no input at all" goes through a single
//! finalization step that prints the final report and the summary line.
//! `run` consumes the engine, so that step happens exactly once.
//!
//! ## Example
//!
//! ```rust
//! use logtally::{AnalyzerConfig, Engine, Interrupt, IterSource, Termination};
//!
//! let config = AnalyzerConfig::new()
//!     .with_fields("1")
//!     .with_time_frequency(0);
//! let engine = Engine::new(&config, Vec::new())?;
//!
//! let mut source = IterSource::new(["GET /a 200", "GET /b 200", "POST /a 201"]);
//! let finished = engine.run(&mut source, &Interrupt::new())?;
//!
//! assert_eq!(finished.summary.termination, Termination::EndOfInput);
//! assert_eq!(finished.state.table.get("GET"), Some(2));
//! # Ok::<(), logtally::AnalyzerError>(())
//! ```

use crate::config::{AnalyzerConfig, LimitConfig};
use crate::counters::{per_second, RunCounters};
use crate::error::Result;
use crate::extract::{FieldSelector, KeyExtractor};
use crate::matcher::{Classification, PatternMatcher};
use crate::report::{format_rate, ReportRenderer, ReportView};
use crate::scheduler::{Fired, Scheduler};
use crate::source::{strip_terminator, LineEvent, LineSource};
use crate::table::FrequencyTable;
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Longest time the engine waits for input before re-checking its clocks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Cancellation flag shared with a signal handler.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request termination. Safe to call from a signal handler thread.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The table held more distinct keys than the configured maximum.
    MaxKeys(usize),
    /// The configured number of seconds elapsed.
    MaxTime(u64),
    /// More lines than the configured maximum were read.
    MaxLines(u64),
    Interrupted,
    /// The input ended after at least one line.
    EndOfInput,
    /// The input ended before a single line was read.
    NoInput,
    /// The input could not be read any further.
    InputError(String),
}

impl Termination {
    /// Message printed before the final report, for causes that have one.
    pub fn message(&self) -> Option<String> {
        match self {
            Termination::MaxKeys(max) => {
                Some(format!("maximum number of keys ({max}) exceeded"))
            }
            Termination::MaxTime(secs) => Some(format!("maximum time of {secs} seconds reached")),
            Termination::MaxLines(max) => {
                Some(format!("maximum number of lines ({max}) exceeded"))
            }
            Termination::InputError(err) => Some(format!("input error: {err}")),
            Termination::Interrupted | Termination::EndOfInput | Termination::NoInput => None,
        }
    }

    /// Whether a final report and summary are printed.
    pub fn flushes(&self) -> bool {
        !matches!(self, Termination::NoInput)
    }
}

/// Totals at the end of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub termination: Termination,
    pub lines: u64,
    pub hits: u64,
    pub rest: u64,
    pub keys: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    /// `None` when the run was too short to compute a rate.
    pub fn lines_per_second(&self) -> Option<f64> {
        per_second(self.lines, self.elapsed)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines parsed in {:.2} seconds ({} lines/s)",
            self.lines,
            self.elapsed.as_secs_f64(),
            format_rate(self.lines_per_second())
        )
    }
}

/// Everything the engine mutates.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub table: FrequencyTable,
    pub counters: RunCounters,
}

impl RunState {
    pub fn new(started: Instant) -> Self {
        Self {
            table: FrequencyTable::new(),
            counters: RunCounters::new(started),
        }
    }

    /// Consistent view of the state at `now` for rendering.
    pub fn view(&self, now: Instant) -> ReportView<'_> {
        ReportView {
            entries: self.table.entries(),
            lines: self.counters.lines,
            hits: self.counters.hits,
            rest: self.counters.rest,
            elapsed: self.counters.elapsed(now),
        }
    }
}

/// What a finished run hands back.
#[derive(Debug)]
pub struct Finished<W> {
    pub summary: RunSummary,
    pub state: RunState,
    pub output: W,
}

/// Streaming classifier and reporter writing to `W`.
pub struct Engine<W: Write> {
    extractor: KeyExtractor,
    matcher: PatternMatcher,
    scheduler: Scheduler,
    renderer: ReportRenderer,
    limits: LimitConfig,
    state: RunState,
    out: W,
}

impl<W: Write> Engine<W> {
    /// Build an engine, compiling every pattern. The run clock starts now.
    pub fn new(config: &AnalyzerConfig, out: W) -> Result<Self> {
        config.validate()?;

        let selector = FieldSelector::parse(&config.matching.fields)?;
        let extractor = KeyExtractor::new(selector, &config.matching.delimiter)?;
        let matcher = PatternMatcher::from_config(&config.matching)?;

        Ok(Self {
            extractor,
            matcher,
            scheduler: Scheduler::from_config(&config.schedule),
            renderer: ReportRenderer::new(config.report.clone()),
            limits: config.limits.clone(),
            state: RunState::new(Instant::now()),
            out,
        })
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Consume lines from `source` until a termination condition, then
    /// print the final report and summary.
    pub fn run<S: LineSource>(
        mut self,
        source: &mut S,
        interrupt: &Interrupt,
    ) -> Result<Finished<W>> {
        info!(
            patterns = self.matcher.pattern_count(),
            exclusion = self.matcher.has_exclusion(),
            max_keys = self.limits.max_keys,
            max_time = self.limits.max_time,
            max_lines = self.limits.max_lines,
            "starting run"
        );

        loop {
            if let Some(termination) = self.check_termination(Instant::now(), interrupt) {
                return self.finish(termination);
            }

            match source.next_event(POLL_INTERVAL) {
                LineEvent::Line(line) => {
                    self.process_line(strip_terminator(&line), Instant::now())?;
                }
                LineEvent::Idle => {
                    let now = Instant::now();
                    let fired = self.scheduler.while_idle(&mut self.state.counters, now);
                    self.emit_reports(fired, now)?;
                }
                LineEvent::End if self.state.counters.lines == 0 => {
                    return self.finish(Termination::NoInput);
                }
                LineEvent::End => return self.finish(Termination::EndOfInput),
                LineEvent::Failed(err) => {
                    warn!(error = %err, "reading input failed");
                    return self.finish(Termination::InputError(err));
                }
            }
        }
    }

    /// Classify and count one line that has already lost its terminator,
    /// then run the report triggers.
    pub fn process_line(&mut self, line: &str, now: Instant) -> Result<()> {
        let RunState { table, counters } = &mut self.state;
        counters.lines += 1;
        counters.lines_since_report += 1;

        let subject = self.extractor.extract_subject(line);
        match self.matcher.classify(&subject) {
            Classification::Excluded => counters.rest += 1,
            Classification::Hits(keys) if keys.is_empty() => counters.rest += 1,
            Classification::Hits(keys) => {
                for key in &keys {
                    table.increment(key.as_str());
                }
                counters.hits += keys.len() as u64;
            }
        }

        let fired = self.scheduler.after_line(&mut self.state.counters, now);
        self.emit_reports(fired, now)
    }

    /// Render the current state to the output.
    pub fn emit_report(&mut self, now: Instant) -> Result<()> {
        let view = self.state.view(now);
        self.renderer.render_to(&view, &mut self.out)?;
        Ok(())
    }

    fn emit_reports(&mut self, fired: Fired, now: Instant) -> Result<()> {
        if !fired.any() {
            return Ok(());
        }
        debug!(
            line_trigger = fired.lines,
            time_trigger = fired.time,
            lines = self.state.counters.lines,
            keys = self.state.table.size(),
            "report triggered"
        );
        for _ in 0..fired.count() {
            self.emit_report(now)?;
        }
        Ok(())
    }

    fn check_termination(&self, now: Instant, interrupt: &Interrupt) -> Option<Termination> {
        let limits = &self.limits;
        let counters = &self.state.counters;

        if limits.max_keys > 0 && self.state.table.size() > limits.max_keys {
            return Some(Termination::MaxKeys(limits.max_keys));
        }
        if limits
            .max_time()
            .is_some_and(|max| counters.elapsed(now) >= max)
        {
            return Some(Termination::MaxTime(limits.max_time));
        }
        if limits.max_lines > 0 && counters.lines > limits.max_lines {
            return Some(Termination::MaxLines(limits.max_lines));
        }
        if interrupt.is_triggered() {
            return Some(Termination::Interrupted);
        }
        None
    }

    fn finish(mut self, termination: Termination) -> Result<Finished<W>> {
        let now = Instant::now();
        info!(?termination, lines = self.state.counters.lines, "run finished");

        if termination.flushes() {
            if let Some(message) = termination.message() {
                writeln!(self.out, "{message}")?;
            }
            self.emit_report(now)?;
        }

        let counters = &self.state.counters;
        let summary = RunSummary {
            termination,
            lines: counters.lines,
            hits: counters.hits,
            rest: counters.rest,
            keys: self.state.table.size(),
            elapsed: counters.elapsed(now),
        };

        if summary.termination.flushes() {
            writeln!(self.out, "{summary}")?;
            self.out.flush()?;
        }

        Ok(Finished {
            summary,
            state: self.state,
            output: self.out,
        })
    }
}
