//! applytrack server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the JSON API. The `export` and `import` subcommands dump
//! or load every record as one JSON file instead of serving.
//!
//! ```
//! cargo run -p applytrack-server -- export --filename backup.json
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use applytrack_server::{DEFAULT_EXPORT_FILE, ServerConfig};
use applytrack_store_sqlite::SqliteStore;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "applytrack job-application tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Write every record to a JSON file.
  Export {
    #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
    filename: PathBuf,
  },
  /// Upsert every record from a file written by `export`.
  Import {
    #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
    filename: PathBuf,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = ServerConfig::load(&cli.config)?;

  if let Some(parent) = cfg.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(&cfg, store).await,
    Command::Export { filename } => {
      let summary = applytrack_server::export_to_file(&store, &filename).await?;
      tracing::info!(
        file = ?filename,
        companies = summary.companies,
        contacts = summary.contacts,
        applications = summary.applications,
        notes = summary.notes,
        "export complete"
      );
      Ok(())
    }
    Command::Import { filename } => {
      let summary = applytrack_server::import_from_file(&store, &filename).await?;
      tracing::info!(
        file = ?filename,
        companies = summary.companies,
        contacts = summary.contacts,
        applications = summary.applications,
        notes = summary.notes,
        "import complete"
      );
      Ok(())
    }
  }
}

async fn serve(cfg: &ServerConfig, store: SqliteStore) -> anyhow::Result<()> {
  let app = applytrack_server::router(Arc::new(store));
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
