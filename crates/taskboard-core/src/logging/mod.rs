//! Structured logging with `tracing`.
//!
//! - [`init_subscriber`] installs the process-wide stderr subscriber
//! - [`capture_logs`] installs a thread-local in-memory subscriber for tests
//!
//! Components log through `tracing` macros with structured fields
//! (`endpoint`, `status`, `generation`, ...). Failures that are swallowed
//! in the background, such as a failed refresh or logout call, log at `warn`.

pub mod test_utils;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

/// Install the process-wide stderr subscriber.
///
/// `RUST_LOG` wins over `level` when set; an unparsable `level` falls back
/// to `warn`. Only the first call in a process has any effect.
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
