//! Logging setup for the `xsdigest` binary.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter for a verbosity count (`-v` repetitions).
#[must_use]
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,xsdigest_harness=info",
        1 => "info,xsdigest_harness=debug,xsdigest_kernel=debug",
        _ => "debug",
    }
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` overrides the verbosity-derived filter. Stdout is left to the
/// digest. A second call is a no-op.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    // Err only when a subscriber is already installed.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
