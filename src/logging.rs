//! Tracing subscriber setup for the binary.

use crate::cli::LogLevel;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Explicit level for `-q`/`-v`; `None` means defer to RUST_LOG.
fn forced_level(level: LogLevel) -> Option<Level> {
    match level {
        LogLevel::Warn => Some(Level::WARN),
        LogLevel::Info => None,
        LogLevel::Debug => Some(Level::DEBUG),
        LogLevel::Trace => Some(Level::TRACE),
    }
}

/// Install the global fmt subscriber.
///
/// Precedence:
/// 1. `quiet` forces WARN+.
/// 2. `-vv` => TRACE.
/// 3. `-v`  => DEBUG.
/// 4. Else RUST_LOG, defaulting to INFO.
pub fn configure_logging(level: LogLevel) {
    let builder = tracing_subscriber::fmt().with_thread_names(true);
    match forced_level(level) {
        Some(max) => builder.with_max_level(max).init(),
        None => builder
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init(),
    }
}
