//! File logging.
//!
//! The TUI owns the terminal, so log output goes to `<logs_dir>/mylo.log`.
//! The filter comes from `MYLO_LOG` when set, otherwise from `[log] level`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Log file name inside the logs directory.
pub const LOG_FILE: &str = "mylo.log";

/// Keeps the background writer alive; drop it to flush on exit.
#[must_use = "dropping the guard stops log output"]
pub struct LogGuard {
    _worker: WorkerGuard,
}

/// Installs the global subscriber writing to `dir/mylo.log`.
///
/// # Errors
/// Returns an error if the directory cannot be created or a subscriber is already set.
pub fn init(config: &LogConfig, dir: &Path) -> Result<LogGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(LogGuard { _worker: worker })
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env("MYLO_LOG").unwrap_or_else(|_| EnvFilter::new(&config.level))
}
