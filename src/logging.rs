//! Tracing setup.
//!
//! The TUI owns the terminal, so it logs to a daily-rotated file under the
//! config directory (`tally.log.YYYY-MM-DD`). CLI commands log to stderr.
//! `RUST_LOG` overrides the default filter in both cases.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::io::config_io;

const LOG_FILE_PREFIX: &str = "tally.log";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// File logging for the TUI, `info` by default. Logging is skipped when no
/// log directory can be created.
pub fn init_tui() {
    let Some(dir) = config_io::logs_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let _ = tracing_subscriber::registry()
        .with(filter("info"))
        .with(layer)
        .try_init();
}

/// Stderr logging for CLI commands, `warn` by default
pub fn init_cli() {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(filter("warn"))
        .with(layer)
        .try_init();
}
