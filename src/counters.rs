//! Process-lifetime run counters.

use std::time::{Duration, Instant};

/// Totals for the whole run.
///
/// Counts only grow. The two trigger fields are the exception and are reset
/// by the [`Scheduler`](crate::scheduler::Scheduler) alone.
#[derive(Debug, Clone)]
pub struct RunCounters {
    /// Lines read from the source, excluded lines included.
    pub lines: u64,
    /// Match events counted into the table.
    pub hits: u64,
    /// Lines that produced no hit, excluded lines included.
    pub rest: u64,
    pub started: Instant,
    /// When the time trigger last fired.
    pub last_report: Instant,
    /// Lines since the last report emitted by either trigger.
    pub lines_since_report: u64,
}

impl RunCounters {
    pub fn new(started: Instant) -> Self {
        Self {
            lines: 0,
            hits: 0,
            rest: 0,
            started,
            last_report: started,
            lines_since_report: 0,
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }
}

impl Default for RunCounters {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

/// Events per second over `elapsed`, or `None` when the window is too short
/// to give a meaningful rate.
pub fn per_second(count: u64, elapsed: Duration) -> Option<f64> {
    const MIN_WINDOW: Duration = Duration::from_millis(1);

    if elapsed < MIN_WINDOW {
        return None;
    }
    Some(count as f64 / elapsed.as_secs_f64())
}
