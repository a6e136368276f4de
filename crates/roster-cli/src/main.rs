//! `roster` — command-line contacts browser.
//!
//! Syncs a paginated contact feed into a local SQLite snapshot and lists or
//! searches it.
//!
//! # Usage
//!
//! ```text
//! roster sync
//! roster search 918
//! roster watch --config ~/.config/roster/roster.toml
//! ```

mod app;
mod client;
mod settings;

use std::{io, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context as _, Result, anyhow, bail};
use app::App;
use clap::{Parser, Subcommand};
use client::{FeedClient, FeedConfig};
use roster_core::store::SnapshotStore;
use roster_store_sqlite::SqliteStore;
use roster_sync::{SyncConfig, SyncController, SyncEvent, spawn_auto_refresh};
use settings::{Settings, expand_tilde};
use tokio::sync::mpsc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

type Controller = SyncController<FeedClient, SqliteStore>;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "roster", version, about = "Sync and browse a remote contact feed")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "roster.toml")]
  config: PathBuf,

  /// Override the SQLite snapshot location.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Fetch every page and replace the local snapshot.
  Sync,
  /// Print the local snapshot.
  List,
  /// Print contacts whose name or phone digits contain QUERY.
  Search { query: String },
  /// Print every field of one contact.
  Show { id: String },
  /// Sync now, then keep refreshing on an interval until Ctrl-C.
  Watch,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Logs go to stderr so command output stays clean.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(path) = &cli.store {
    settings.store_path = expand_tilde(path);
  }

  let store = Arc::new(open_store(&settings).await?);

  match cli.command {
    Command::Sync => sync_once(&settings, store).await,
    Command::List => {
      let app = App::new(store.current_view().await?);
      app.render_list(&mut io::stdout().lock())?;
      Ok(())
    }
    Command::Search { query } => {
      let mut app = App::new(store.current_view().await?);
      app.search(&query);
      app.render_list(&mut io::stdout().lock())?;
      Ok(())
    }
    Command::Show { id } => {
      let view = store.current_view().await?;
      let contact = view
        .find(&id)
        .ok_or_else(|| anyhow!("no contact with id {id:?}"))?;
      app::render_detail(contact, &mut io::stdout().lock())?;
      Ok(())
    }
    Command::Watch => watch(&settings, store).await,
  }
}

async fn open_store(settings: &Settings) -> Result<SqliteStore> {
  let path = &settings.store_path;
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  SqliteStore::open(path)
    .await
    .with_context(|| format!("failed to open store at {}", path.display()))
}

fn controller(
  settings: &Settings,
  store: Arc<SqliteStore>,
) -> Result<(Controller, mpsc::UnboundedReceiver<SyncEvent>)> {
  let client = FeedClient::new(FeedConfig {
    url_template: settings.feed_url.clone(),
    timeout:      Duration::from_secs(settings.request_timeout_secs),
  })
  .context("failed to build HTTP client")?;
  let config = SyncConfig::new(settings.page_ceiling, settings.page_size)?;
  Ok(SyncController::new(client, store, config))
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn sync_once(settings: &Settings, store: Arc<SqliteStore>) -> Result<()> {
  let (sync, mut events) = controller(settings, store)?;
  sync.start()?;

  match events.recv().await {
    Some(SyncEvent::Completed { count, .. }) => {
      println!("Synced {count} contacts.");
      Ok(())
    }
    Some(SyncEvent::Failed { failure, .. }) => bail!("sync failed: {failure}"),
    None => bail!("sync stopped without reporting an outcome"),
  }
}

async fn watch(settings: &Settings, store: Arc<SqliteStore>) -> Result<()> {
  let (sync, mut events) = controller(settings, Arc::clone(&store))?;
  let mut app = App::new(store.current_view().await?);

  // Subscribed before the first start so every session shows up, including
  // the ones auto-refresh begins.
  let mut status = sync.subscribe();
  sync.start()?;

  let period = Duration::from_secs(settings.refresh_interval_secs.max(1));
  let refresher = spawn_auto_refresh(sync.clone(), period);

  loop {
    tokio::select! {
      changed = status.changed() => {
        if changed.is_err() { break }
        let (session, rows) = {
          let s = status.borrow_and_update();
          (s.session_id(), s.placeholder_rows(settings.page_size))
        };
        if app.on_sync_progress(session, rows) {
          app.render_list(&mut io::stdout().lock())?;
        }
      }
      event = events.recv() => {
        let Some(event) = event else { break };
        let snapshot = match &event {
          SyncEvent::Completed { .. } => Some(store.current_view().await?),
          SyncEvent::Failed { .. } => None,
        };
        app.on_sync_event(&event, snapshot);
        println!();
        app.render_list(&mut io::stdout().lock())?;
      }
      _ = tokio::signal::ctrl_c() => {
        tracing::info!("interrupted, stopping auto-refresh");
        break;
      }
    }
  }

  refresher.abort();
  Ok(())
}
