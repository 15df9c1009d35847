//! travels server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, clears it unless told otherwise, and serves the JSON API over
//! HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use travels_core::store::TravelStore as _;
use travels_server::{ServerConfig, init_tracing};
use travels_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Travels JSON API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Keep existing rows instead of clearing the store at startup.
  #[arg(long)]
  keep_data: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config).context("failed to read config")?;

  init_tracing(server_cfg.log_file.as_deref())?;

  let store_path = server_cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if server_cfg.reset_on_start && !cli.keep_data {
    store.reset().await.context("failed to reset store")?;
    tracing::info!(path = ?store_path, "store cleared");
  }

  let app = travels_server::app(Arc::new(store));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
