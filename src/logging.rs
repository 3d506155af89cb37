//! File logging. The terminal belongs to the UI, so nothing goes to stdout.

use color_eyre::{eyre::eyre, Result};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a daily-rotating file subscriber under `logs_dir`.
///
/// `RUST_LOG` overrides the default filter.
pub fn setup_logging(logs_dir: &Path) -> Result<()> {
  std::fs::create_dir_all(logs_dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", logs_dir.display(), e))?;

  let file_appender = RollingFileAppender::builder()
    .rotation(Rotation::DAILY)
    .max_log_files(7)
    .filename_prefix("userdeck")
    .filename_suffix("log")
    .build(logs_dir)
    .map_err(|e| eyre!("Failed to open log file in {}: {}", logs_dir.display(), e))?;

  let file_layer = fmt::layer()
    .with_target(true)
    .with_level(true)
    .with_ansi(false)
    .with_writer(file_appender);

  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,userdeck=debug"));

  tracing_subscriber::registry()
    .with(filter)
    .with(file_layer)
    .try_init()
    .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;

  Ok(())
}
