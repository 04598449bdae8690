//! Binary entrypoint for the monitor web UI.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use funnel_engine::{logging, Config};
use monitor_web::AppState;

#[derive(Debug, Parser)]
#[command(name = "monitor-web", version, about = "Serve pipeline monitor reports over HTTP")]
struct Args {
  /// Configuration file (defaults to $PIPELINE_MONITOR_CONFIG, then ./config.toml).
  #[arg(long)]
  config: Option<PathBuf>,

  /// Listen address, overrides `server.address`.
  #[arg(long)]
  address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let args = Args::parse();
  logging::init("info");

  let config = Config::load(args.config.as_deref())?;
  let address = args.address.unwrap_or_else(|| config.server.address.clone());

  let state = Arc::new(AppState::load(&config.logs, config.analysis.correlation()));
  let app = monitor_web::router(state, &config.server.static_dir);

  let listener = tokio::net::TcpListener::bind(address.as_str()).await?;
  info!(address = %listener.local_addr()?, "monitor-web listening");
  axum::serve(listener, app).await?;

  Ok(())
}
