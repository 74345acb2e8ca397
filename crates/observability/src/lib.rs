//! Tracing/logging setup shared by the binaries.

use tracing_subscriber::EnvFilter;

/// Initialize process-wide tracing.
///
/// The filter comes from `RUST_LOG` (default `info`); output is JSON lines.
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
