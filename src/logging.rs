// ==========================================
// Daily Works Exchange - Logging Setup
// ==========================================
// Tools: tracing + tracing-subscriber
// Level is driven by the RUST_LOG environment variable.
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global subscriber.
///
/// # Environment
/// - RUST_LOG: level filter (default: info)
///   e.g. RUST_LOG=debug or RUST_LOG=daily_works_exchange=trace
///
/// # Example
/// ```no_run
/// use daily_works_exchange::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Verbose subscriber for tests; safe to call more than once.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
