//! Periodic report triggers.
//!
//! Two clocks run side by side and are never merged:
//!
//! - the line trigger counts lines since the last report emitted by either
//!   trigger, and fires when that count reaches its frequency;
//! - the time trigger measures wall-clock time since it last fired itself,
//!   regardless of reports emitted by the line trigger.

use crate::config::ScheduleConfig;
use crate::counters::RunCounters;
use std::time::{Duration, Instant};

/// Fires every `every` lines. Zero disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTrigger {
    every: u64,
}

impl LineTrigger {
    pub fn new(every: u64) -> Self {
        Self { every }
    }

    pub fn is_enabled(&self) -> bool {
        self.every > 0
    }

    fn check(&self, counters: &mut RunCounters) -> bool {
        if !self.is_enabled() || counters.lines_since_report < self.every {
            return false;
        }
        counters.lines_since_report = 0;
        true
    }
}

/// Fires every `every` of wall-clock time. A zero period disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTrigger {
    every: Duration,
}

impl TimeTrigger {
    pub fn new(every: Duration) -> Self {
        Self { every }
    }

    pub fn is_enabled(&self) -> bool {
        !self.every.is_zero()
    }

    fn check(&self, counters: &mut RunCounters, now: Instant) -> bool {
        if !self.is_enabled() || now.saturating_duration_since(counters.last_report) < self.every {
            return false;
        }
        counters.last_report = now;
        counters.lines_since_report = 0;
        true
    }
}

/// Which triggers fired during one check. Each one asks for its own report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fired {
    pub lines: bool,
    pub time: bool,
}

impl Fired {
    pub fn count(&self) -> usize {
        usize::from(self.lines) + usize::from(self.time)
    }

    pub fn any(&self) -> bool {
        self.lines || self.time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    lines: LineTrigger,
    time: TimeTrigger,
}

impl Scheduler {
    pub fn new(lines: LineTrigger, time: TimeTrigger) -> Self {
        Self { lines, time }
    }

    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self::new(
            LineTrigger::new(config.line_frequency),
            TimeTrigger::new(Duration::from_secs(config.time_frequency)),
        )
    }

    /// Check both triggers after a line was processed. The line trigger is
    /// evaluated first.
    pub fn after_line(&self, counters: &mut RunCounters, now: Instant) -> Fired {
        let lines = self.lines.check(counters);
        let time = self.time.check(counters, now);
        Fired { lines, time }
    }

    /// Check the time trigger while no input is arriving.
    pub fn while_idle(&self, counters: &mut RunCounters, now: Instant) -> Fired {
        Fired {
            lines: false,
            time: self.time.check(counters, now),
        }
    }
}
