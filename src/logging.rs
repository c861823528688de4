//! Logging initialization.
//!
//! Logs go to a per-run file under `~/.cache/superman/logs/` so they never
//! interleave with streamed model output or command output on the terminal.
//! The level is controlled by `RUST_LOG` and defaults to `info`.

use chrono::Local;
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::constants::{APP_NAME, DEFAULT_LOG_FILTER};

fn log_dir() -> PathBuf {
    Config::cache_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|_| std::env::temp_dir().join(APP_NAME).join("logs"))
}

/// Install the global subscriber.
///
/// The returned guard flushes the non-blocking writer on drop and must be
/// held for the life of the program. Returns `None` (after a warning on
/// stderr) if the log file cannot be created; the program runs unlogged.
pub fn init_logging() -> Option<WorkerGuard> {
    let log_dir = log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("warning: failed to create log directory {}: {}", log_dir.display(), e);
        return None;
    }

    // e.g. superman.2024-12-06-14-30-25.log
    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    let log_path = log_dir.join(format!("{}.{}.log", APP_NAME, timestamp));

    let log_file = match fs::File::create(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("warning: failed to create log file {}: {}", log_path.display(), e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized - writing to {}", log_path.display());
    Some(guard)
}
