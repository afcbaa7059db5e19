//! File logging for the TUI.
//!
//! The terminal belongs to the UI, so events go to a non-blocking file
//! writer instead of stderr. Without a configured log file nothing is
//! installed and events are dropped.

use std::path::Path;

use anyhow::{anyhow, Result};
use railbook_client::{ClientConfig, LogLevel};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(level: LogLevel) -> String {
    format!(
        "railbook_tui={0},railbook_client={0},railbook_core={0}",
        level.as_filter_str()
    )
}

/// Install the file subscriber; keep the guard alive until exit
pub fn init_file_logging(config: &ClientConfig) -> Result<Option<WorkerGuard>> {
    let Some(path) = &config.log_file else {
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log file path {} has no file name", path.display()))?;
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config.log_level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .try_init()?;

    Ok(Some(guard))
}
