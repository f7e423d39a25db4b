//! Server assembly for applytrack: configuration, the top-level router, and
//! the bulk export/import commands.
//!
//! The binary in `main.rs` is a thin CLI over these functions.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use applytrack_core::{
  store::TrackerStore,
  transfer::{Snapshot, TransferSummary},
};
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` layered with
/// `APPLYTRACK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  /// Read `path` (optional) and the environment. Missing keys fall back to
  /// `127.0.0.1:8000` and `applytrack.db`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8000)?
      .set_default("store_path", "applytrack.db")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("APPLYTRACK"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// The full HTTP surface: the JSON API under `/api`, with a tracing span per
/// request.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: TrackerStore + 'static,
{
  Router::new()
    .nest("/api", applytrack_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

// ─── Bulk transfer ───────────────────────────────────────────────────────────

/// Default file for `export` and `import`.
pub const DEFAULT_EXPORT_FILE: &str = "full_export.json";

/// Dump every record to `path` as pretty-printed JSON.
pub async fn export_to_file<S>(store: &S, path: &Path) -> anyhow::Result<TransferSummary>
where
  S: TrackerStore,
{
  let snapshot = store
    .export_snapshot()
    .await
    .context("failed to read store")?;
  let json = serde_json::to_vec_pretty(&snapshot).context("failed to encode export")?;
  tokio::fs::write(path, json)
    .await
    .with_context(|| format!("failed to write {path:?}"))?;
  Ok(snapshot.summary())
}

/// Upsert every record from a file written by [`export_to_file`].
pub async fn import_from_file<S>(store: &S, path: &Path) -> anyhow::Result<TransferSummary>
where
  S: TrackerStore,
{
  let bytes = tokio::fs::read(path)
    .await
    .with_context(|| format!("failed to read {path:?}"))?;
  let snapshot: Snapshot =
    serde_json::from_slice(&bytes).with_context(|| format!("{path:?} is not a valid export"))?;
  store
    .import_snapshot(snapshot)
    .await
    .context("failed to import records")
}

#[cfg(test)]
mod tests {
  use super::*;
  use applytrack_core::{
    application::ApplicationChanges, company::NewCompany, identity::NewUser,
    note::NoteDescriptor,
  };
  use applytrack_store_sqlite::SqliteStore;
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt as _;

  fn scratch_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("applytrack-{}-{name}", std::process::id()))
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else {
      return;
    };
    assert_eq!(
      expand_tilde(Path::new("~/data/app.db")),
      PathBuf::from(home).join("data/app.db")
    );
    assert_eq!(expand_tilde(Path::new("/abs/app.db")), PathBuf::from("/abs/app.db"));
  }

  #[test]
  fn missing_config_file_uses_defaults() {
    let cfg = ServerConfig::load(&scratch_file("absent.toml")).unwrap();
    assert_eq!(cfg.port, 8000);
    assert_eq!(cfg.store_path, PathBuf::from("applytrack.db"));
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let app = router(store);

    let req = Request::builder()
      .uri("/api/capabilities")
      .body(Body::empty())
      .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder().uri("/capabilities").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn export_file_imports_into_a_fresh_store() {
    let source = SqliteStore::open_in_memory().await.unwrap();
    let user = source
      .create_user(NewUser {
        username:      "erika".into(),
        email:         "erika@tech.sol".into(),
        password_hash: "x".into(),
      })
      .await
      .unwrap();
    let company = source
      .create_company(user.id, NewCompany {
        name:     "Tech Solutions".into(),
        website:  None,
        industry: "IT".into(),
      })
      .await
      .unwrap();
    source
      .create_application(user.id, ApplicationChanges {
        job_title: Some("Senior Python Developer".into()),
        company_id: Some(company.id),
        notes: Some(vec![NoteDescriptor { id: None, text: Some("hi".into()) }]),
        ..Default::default()
      })
      .await
      .unwrap();

    let path = scratch_file("export.json");
    let exported = export_to_file(&source, &path).await.unwrap();
    assert_eq!((exported.companies, exported.applications, exported.notes), (1, 1, 1));

    let target = SqliteStore::open_in_memory().await.unwrap();
    target
      .create_user(NewUser {
        username:      "erika".into(),
        email:         "erika@tech.sol".into(),
        password_hash: "x".into(),
      })
      .await
      .unwrap();
    let imported = import_from_file(&target, &path).await.unwrap();
    assert_eq!(imported, exported);
    assert_eq!(
      target.export_snapshot().await.unwrap(),
      source.export_snapshot().await.unwrap()
    );

    std::fs::remove_file(&path).ok();
    assert!(import_from_file(&target, &path).await.is_err());
  }
}
