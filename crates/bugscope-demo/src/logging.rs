#![forbid(unsafe_code)]

//! Subscriber setup for the demo binary.

use tracing_subscriber::EnvFilter;

/// Environment variable holding log filter directives.
pub const LOG_ENV: &str = "BUGSCOPE_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install a stderr subscriber filtered by [`LOG_ENV`].
///
/// Does nothing if a global subscriber is already set.
pub fn init(json: bool) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
