//! Logging setup for binaries built on this crate.
//!
//! Logs go to stderr so that commands writing a document to stdout stay
//! pipeable. `RUST_LOG` takes precedence over the verbosity level.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map a `-v` count to a log level.
///
/// 0 shows warnings, 1 info, 2 debug, 3 or more trace.
pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(verbosity: u8) {
    let default_level = level_for_verbosity(verbosity);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "schemasplit={level},schemasplit_cli={level}",
                level = default_level
            ))
        });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
