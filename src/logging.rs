use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize diagnostics on stderr.
///
/// `RUST_LOG` takes precedence. Otherwise the level follows the number of
/// `-v` flags. Stdout is left to the report.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
