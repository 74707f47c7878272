//! Logging configuration using tracing
//!
//! The terminal UI owns stdout, so all log output goes to a daily rolling
//! file. Level is controlled by the `TOMATO_LOG` environment variable.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{Error, Result};

pub const LOG_ENV: &str = "TOMATO_LOG";
const LOG_FILE_PREFIX: &str = "tomato_timer.log";
const DEFAULT_FILTER: &str = "tomato_timer=info,warn";

/// Default log directory: `<data_local_dir>/tomato_timer/logs`
pub fn default_log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("tomato_timer").join("logs")
}

/// Initialize the logging subsystem.
///
/// The returned guard flushes buffered lines on drop and must be held for
/// the life of the program.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir).map_err(|source| Error::LogDirectory {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .map_err(|e| Error::LoggingInit(e.to_string()))?;

    tracing::info!("Tomato Timer starting");
    tracing::info!("Log directory: {}", log_dir.display());

    Ok(guard)
}
