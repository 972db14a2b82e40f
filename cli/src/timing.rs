//! Log and latency output for the CLI.
//!
//! Installs a `tracing` subscriber on stderr. Library crates log through the
//! `log` facade; those records are forwarded into the same subscriber. With
//! `--timing`, every `#[instrument]`ed command reports its duration when its
//! span closes.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Default level for the given flags. `RUST_LOG` still takes precedence.
pub fn default_level(verbose: bool, timing: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else if timing {
        // Span close events are emitted at INFO.
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

/// Initialize the tracing subscriber.
///
/// # Arguments
/// * `verbose` - debug-level logging, including cache hits and misses
/// * `timing` - log span close events with their duration
pub fn init_tracing(verbose: bool, timing: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, timing).into())
        .from_env_lossy();

    let span_events = if timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_level(true)
                .with_span_events(span_events)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
