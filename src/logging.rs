//! Logging setup
//!
//! Diagnostics are written to stderr so reporters keep stdout to themselves.
//! `RUST_LOG` overrides the default filter.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Default filter for the given verbosity
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

/// Install the global subscriber; later calls are ignored
pub fn init(verbose: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose).into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
