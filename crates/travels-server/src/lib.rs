//! Server assembly for the travels service.
//!
//! Loads [`ServerConfig`], installs logging, and wraps the
//! [`travels_api`] router with request tracing. The binary in `main.rs` only
//! wires these together.

use std::{
  fs::OpenOptions,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
};

use anyhow::Context as _;
use axum::Router;
use serde::Deserialize;
use tower_http::{
  LatencyUnit,
  trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;
use travels_core::store::TravelStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TRAVELS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// Clear every table after opening the store.
  pub reset_on_start: bool,
  /// Write JSON log lines here instead of to stderr.
  #[serde(default)]
  pub log_file:       Option<PathBuf>,
}

impl ServerConfig {
  /// Load from `path` (optional) layered under the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 8000)?
      .set_default("store_path", "./data.db")?
      .set_default("reset_on_start", true)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("TRAVELS"))
      .build()?
      .try_deserialize()
  }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Logging ──────────────────────────────────────────────────────────────────

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. With a `log_file`
/// the output is JSON, one event per line, appended to that file.
pub fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  match log_file {
    Some(path) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {path:?}"))?;
      tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .init();
    }
    None => tracing_subscriber::fmt().with_env_filter(filter).init(),
  }
  Ok(())
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router with one `INFO` span and response event per request.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: TravelStore + 'static,
{
  travels_api::api_router(store).layer(
    TraceLayer::new_for_http()
      .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
      .on_response(
        DefaultOnResponse::new()
          .level(Level::INFO)
          .latency_unit(LatencyUnit::Micros),
      ),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt as _;
  use travels_store_sqlite::SqliteStore;

  #[test]
  fn missing_config_file_uses_defaults() {
    let cfg = ServerConfig::load(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.port, 8000);
    assert_eq!(cfg.store_path, PathBuf::from("./data.db"));
    assert!(cfg.reset_on_start);
    assert!(cfg.log_file.is_none());
  }

  #[test]
  fn config_file_overrides_defaults() {
    let dir = std::env::temp_dir().join(format!("travels-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.toml");
    std::fs::write(
      &path,
      "port = 9001\nreset_on_start = false\nlog_file = \"travels.log\"\n",
    )
    .unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 9001);
    assert_eq!(cfg.host, "0.0.0.0");
    assert!(!cfg.reset_on_start);
    assert_eq!(cfg.log_file, Some(PathBuf::from("travels.log")));
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/travels/data.db")),
      PathBuf::from(home).join("travels/data.db")
    );
    assert_eq!(expand_tilde(Path::new("./data.db")), PathBuf::from("./data.db"));
  }

  #[tokio::test]
  async fn traced_app_serves_api() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let req = Request::builder().uri("/locations").body(Body::empty()).unwrap();
    let resp = app(Arc::new(store)).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, serde_json::json!([]));
  }
}
