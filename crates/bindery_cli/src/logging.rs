//! Log output for the command-line host.
//!
//! Diagnostics go to standard error through `tracing-subscriber`. The
//! filter comes from `BINDERY_LOG` when set, otherwise from the number of
//! `-v` flags.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "BINDERY_LOG";

/// Returns the default level for a `-v` count.
#[must_use]
pub fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Builds the filter: `BINDERY_LOG` if it parses, the verbosity level otherwise.
#[must_use]
pub fn filter_for(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)))
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_logging(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
