// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Level resolution: `--log-level` flag, then the `WATCHRUN_LOG`
//! environment variable, then `info`.

use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Initialise the global logging subscriber. Call once at startup;
/// a second call panics inside `tracing-subscriber`.
pub fn init_logging(cli_level: Option<LogLevel>) {
    let level = cli_level
        .map(tracing::Level::from)
        .or_else(|| {
            std::env::var("WATCHRUN_LOG")
                .ok()
                .and_then(|s| s.trim().parse().ok())
        })
        .unwrap_or(tracing::Level::INFO);

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

impl From<LogLevel> for tracing::Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
