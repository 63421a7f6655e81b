//! Line sources feeding the engine.
//!
//! The engine only ever waits in [`LineSource::next_event`]. Sources that
//! can block indefinitely (stdin) hand lines over from a reader thread so the
//! engine can wake up periodically for its timers and interrupt checks.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// What a source produced when asked for the next line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// One line, possibly still carrying its terminator.
    Line(String),
    /// Nothing arrived within the wait period.
    Idle,
    /// The stream ended normally.
    End,
    /// Reading failed; the stream is unusable.
    Failed(String),
}

pub trait LineSource {
    /// Wait up to `wait` for the next line.
    fn next_event(&mut self, wait: Duration) -> LineEvent;
}

/// Reads any `BufRead` on a background thread.
///
/// Invalid UTF-8 is replaced rather than treated as an error, so one bad
/// byte does not end a long-running tail.
pub struct ReaderSource {
    rx: Receiver<LineEvent>,
}

impl ReaderSource {
    pub fn spawn<R>(reader: R) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("logtally-reader".to_string())
            .spawn(move || {
                let mut reader = reader;
                let mut buf = Vec::new();
                loop {
                    buf.clear();
                    let event = match reader.read_until(b'\n', &mut buf) {
                        Ok(0) => LineEvent::End,
                        Ok(_) => LineEvent::Line(String::from_utf8_lossy(&buf).into_owned()),
                        Err(e) => LineEvent::Failed(e.to_string()),
                    };
                    let last = !matches!(event, LineEvent::Line(_));
                    // the engine hung up; nobody is listening any more
                    if tx.send(event).is_err() || last {
                        break;
                    }
                }
            })?;
        Ok(Self { rx })
    }
}

impl LineSource for ReaderSource {
    fn next_event(&mut self, wait: Duration) -> LineEvent {
        match self.rx.recv_timeout(wait) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => LineEvent::Idle,
            Err(RecvTimeoutError::Disconnected) => LineEvent::End,
        }
    }
}

/// Standard input as a line source.
pub fn stdin() -> io::Result<ReaderSource> {
    ReaderSource::spawn(io::BufReader::new(io::stdin()))
}

/// In-memory source over any iterator of lines. Never idles.
pub struct IterSource<I> {
    lines: I,
}

impl<I> IterSource<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    pub fn new<T: IntoIterator<IntoIter = I>>(lines: T) -> Self {
        Self {
            lines: lines.into_iter(),
        }
    }
}

impl<I> LineSource for IterSource<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    fn next_event(&mut self, _wait: Duration) -> LineEvent {
        match self.lines.next() {
            Some(line) => LineEvent::Line(line.into()),
            None => LineEvent::End,
        }
    }
}

/// Remove one trailing `\n` or `\r\n`.
pub fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
