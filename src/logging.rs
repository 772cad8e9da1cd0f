//! Logging setup for the command line tool

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for the given verbosity
///
/// `RUST_LOG` takes precedence over `level` when set. Calling this more than
/// once keeps the first subscriber.
pub fn init_logging(level: &str, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let initialized = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_line_number(verbose)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if initialized {
        debug!(level, "logging initialized");
    }
}
