//! File logging. The terminal belongs to the TUI, so every event goes to a
//! daily rolling file instead.

use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

const LOG_FILE: &str = "txr.log";

/// Install the global subscriber.
///
/// The filter comes from `TXR_LOG`, then `RUST_LOG`, then `config.level`.
/// The returned guard flushes the writer on drop and must outlive the app.
pub fn init(config: &LogConfig) -> Result<WorkerGuard> {
  let dir = log_dir(config)?;
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(&dir, LOG_FILE);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let directive = filter_directive(
    std::env::var("TXR_LOG").ok(),
    std::env::var("RUST_LOG").ok(),
    &config.level,
  );
  let filter =
    EnvFilter::try_new(&directive).map_err(|e| eyre!("Invalid log filter '{}': {}", directive, e))?;

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  Ok(guard)
}

fn log_dir(config: &LogConfig) -> Result<PathBuf> {
  if let Some(dir) = &config.dir {
    return Ok(dir.clone());
  }
  dirs::data_dir()
    .map(|d| d.join("txr").join("logs"))
    .ok_or_else(|| eyre!("Could not determine data directory; set log.dir in the config"))
}

fn filter_directive(txr_log: Option<String>, rust_log: Option<String>, level: &str) -> String {
  txr_log
    .filter(|s| !s.trim().is_empty())
    .or_else(|| rust_log.filter(|s| !s.trim().is_empty()))
    .unwrap_or_else(|| level.to_string())
}
