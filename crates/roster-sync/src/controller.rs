//! [`SyncController`] — drives one paginated fetch-and-commit session at a time.

use std::{num::NonZeroU32, sync::Arc};

use roster_core::{
  contact::Contact,
  store::{PageFetcher, SnapshotStore},
  Error, Result, SyncFailure,
};
use tokio::sync::{mpsc, watch};
use tracing::{Instrument as _, debug, error, info, warn};
use uuid::Uuid;

use crate::status::{SyncEvent, SyncPhase, SyncStatus};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Locally configured paging limits; nothing here is negotiated with the feed.
#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
  /// Pages fetched per session.
  pub page_ceiling: NonZeroU32,
  /// Expected contacts per page; only used to size placeholder rows.
  pub page_size:    usize,
}

impl SyncConfig {
  pub fn new(page_ceiling: u32, page_size: usize) -> Result<Self> {
    let page_ceiling = NonZeroU32::new(page_ceiling)
      .ok_or_else(|| Error::InvalidConfig("page_ceiling must be at least 1".into()))?;
    Ok(Self { page_ceiling, page_size })
  }
}

impl Default for SyncConfig {
  fn default() -> Self {
    Self {
      page_ceiling: NonZeroU32::new(3).unwrap_or(NonZeroU32::MIN),
      page_size:    20,
    }
  }
}

// ─── Controller ──────────────────────────────────────────────────────────────

/// Runs sync sessions against a fetcher and a snapshot store.
///
/// Cloning is cheap; clones share the same session state. `start` must be
/// called from within a tokio runtime.
pub struct SyncController<F, S> {
  inner: Arc<Inner<F, S>>,
}

impl<F, S> Clone for SyncController<F, S> {
  fn clone(&self) -> Self { Self { inner: Arc::clone(&self.inner) } }
}

struct Inner<F, S> {
  fetcher: F,
  store:   Arc<S>,
  config:  SyncConfig,
  status:  watch::Sender<SyncStatus>,
  events:  mpsc::UnboundedSender<SyncEvent>,
}

impl<F, S> SyncController<F, S>
where
  F: PageFetcher + 'static,
  S: SnapshotStore + 'static,
{
  /// Build a controller and the receiving end of its event channel.
  pub fn new(
    fetcher: F,
    store: Arc<S>,
    config: SyncConfig,
  ) -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
    let (status, _) = watch::channel(SyncStatus::default());
    let (events, events_rx) = mpsc::unbounded_channel();
    let inner = Inner { fetcher, store, config, status, events };
    (Self { inner: Arc::new(inner) }, events_rx)
  }

  pub fn config(&self) -> SyncConfig { self.inner.config }

  pub fn store(&self) -> &Arc<S> { &self.inner.store }

  /// Observe every state transition.
  pub fn subscribe(&self) -> watch::Receiver<SyncStatus> { self.inner.status.subscribe() }

  /// Borrow the current status. Do not hold the guard across an `.await`.
  pub fn status(&self) -> watch::Ref<'_, SyncStatus> { self.inner.status.borrow() }

  pub fn is_in_progress(&self) -> bool { self.inner.status.borrow().in_progress() }

  /// Begin a new session and return its identifier.
  ///
  /// Fails with [`Error::AlreadyInProgress`] while another session is
  /// fetching or committing; that session is left untouched.
  pub fn start(&self) -> Result<Uuid> {
    let session = Uuid::new_v4();
    let ceiling = self.inner.config.page_ceiling;

    let claimed = self.inner.status.send_if_modified(|status| {
      if status.in_progress() {
        return false;
      }
      *status = SyncStatus::begin(session, ceiling);
      true
    });
    if !claimed {
      return Err(Error::AlreadyInProgress);
    }

    info!(%session, pages = ceiling.get(), "sync session started");
    let inner = Arc::clone(&self.inner);
    tokio::spawn(
      inner
        .run_session(session)
        .instrument(tracing::info_span!("sync", %session)),
    );
    Ok(session)
  }
}

impl<F, S> Inner<F, S>
where
  F: PageFetcher + 'static,
  S: SnapshotStore + 'static,
{
  /// Runs to completion even when the fetcher panics, so every session ends
  /// with exactly one event.
  async fn run_session(self: Arc<Self>, session: Uuid) {
    let inner = Arc::clone(&self);
    let fetched = tokio::spawn(async move { inner.fetch_pages().await }.in_current_span()).await;

    let outcome = match fetched {
      Ok(Ok(())) => self.commit().await,
      Ok(Err(failure)) => Err(failure),
      Err(e) => {
        error!(error = %e, "page fetch task aborted");
        Err(SyncFailure::Fetch { reason: e.to_string() })
      }
    };

    let event = match outcome {
      Ok(count) => {
        self.status.send_modify(|s| s.finish(SyncPhase::Idle));
        info!(count, "sync session completed");
        SyncEvent::Completed { session, count }
      }
      Err(failure) => {
        self.status.send_modify(|s| s.finish(SyncPhase::Failed(failure.clone())));
        warn!(reason = %failure, "sync session failed");
        SyncEvent::Failed { session, failure }
      }
    };

    if self.events.send(event).is_err() {
      debug!("no listener for sync events");
    }
  }

  /// Request pages `1..=ceiling` strictly in order, appending each result.
  async fn fetch_pages(&self) -> Result<(), SyncFailure> {
    let ceiling = self.config.page_ceiling;
    let mut page = NonZeroU32::MIN;

    loop {
      self.status.send_modify(|s| {
        s.phase = SyncPhase::FetchingPage(page);
        s.current_page = page.get();
      });

      let contacts = self
        .fetcher
        .fetch(page)
        .await
        .map_err(|e| SyncFailure::Fetch { reason: e.to_string() })?;

      debug!(page = page.get(), count = contacts.len(), "page received");
      self.status.send_modify(|s| s.accumulated.extend(contacts));

      if page >= ceiling {
        return Ok(());
      }
      page = page.saturating_add(1);
    }
  }

  /// Hand the accumulated list to the store on a separate task and wait for
  /// its result.
  async fn commit(&self) -> Result<usize, SyncFailure> {
    self.status.send_modify(|s| s.phase = SyncPhase::Committing);
    let items: Vec<Contact> = self.status.borrow().accumulated.clone();
    let count = items.len();

    let store = Arc::clone(&self.store);
    let replaced = tokio::spawn(async move { store.replace_all(items).await }).await;

    let detail = match replaced {
      Ok(Ok(())) => return Ok(count),
      Ok(Err(e)) => e.to_string(),
      Err(e) => e.to_string(),
    };
    error!(error = %detail, "snapshot replacement failed");
    Err(SyncFailure::Persistence { detail })
  }
}
