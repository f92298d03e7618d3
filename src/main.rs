mod app;
mod backend;
mod cache;
mod commands;
mod config;
mod event;
mod logging;
mod sync;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "txr")]
#[command(about = "A terminal UI for reviewing and approving transactions")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/txr/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Base URL of a transactions API; uses the HTTP backend instead of the fixture
  #[arg(short, long)]
  url: Option<String>,

  /// Log filter, e.g. "debug" or "txr::sync=trace"
  #[arg(short, long)]
  log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line overrides
  if let Some(url) = args.url {
    config = config.with_url(url);
  }
  if let Some(level) = args.log_level {
    config.log.level = level;
  }

  let _log_guard = logging::init(&config.log)?;
  info!(backend = ?config.backend, "configuration loaded");

  // Initialize and run the app
  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}
