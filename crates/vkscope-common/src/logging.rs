use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "VKSCOPE_LOG";

/// Initialize structured logging with environment filter.
/// Set VKSCOPE_LOG=debug (or trace, info, warn, error) for verbosity control.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Same as [`init_logging`] but with a caller-chosen fallback directive,
/// used by the CLI's `--verbose` flag.
pub fn init_logging_with_default(default_directive: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second init (tests, embedders with their own subscriber) is not fatal.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init();
}
