mod api;
mod app;
mod commands;
mod config;
mod debounce;
mod event;
mod logging;
mod query;
mod routes;
mod search;
mod store;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "userdeck")]
#[command(about = "A terminal UI for browsing and editing a remote user directory")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/userdeck/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Base URL of the user service, overrides api.base_url
  #[arg(short, long)]
  base_url: Option<String>,

  /// Route to open at startup, e.g. "/12" or "/about"
  #[arg(default_value = "/")]
  path: String,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Override base URL if specified on command line
  if let Some(base_url) = args.base_url {
    config.api.base_url = base_url;
    config.base_url()?;
  }

  logging::setup_logging(&config.log_dir()?)?;
  info!(
    version = env!("CARGO_PKG_VERSION"),
    stale_secs = config.cache.stale_secs,
    debounce_ms = config.search.debounce_ms,
    "starting userdeck"
  );

  // Initialize and run the app
  let start = routes::Route::parse(&args.path);
  let mut app = app::App::new(config, start)?;
  app.run().await?;

  Ok(())
}
