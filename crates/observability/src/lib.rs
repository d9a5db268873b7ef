//! Tracing/logging setup for processes hosting the restock engine.
//!
//! The engine itself only emits `tracing` events; initializing a subscriber
//! is the hosting process's job, and this crate gives it the standard one:
//! JSON lines, timestamps, `RUST_LOG`-style filtering.

use tracing_subscriber::EnvFilter;

/// Initialize process-wide logging.
///
/// Defaults to `info` when `RUST_LOG` is unset. Safe to call multiple times;
/// subsequent calls become no-ops.
pub fn init() {
    init_with_default_filter("info");
}

/// Initialize with an explicit fallback filter (still overridable via
/// `RUST_LOG`).
pub fn init_with_default_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
