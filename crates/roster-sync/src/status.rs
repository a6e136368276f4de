//! Observable session state and the per-session outcome event.

use std::num::NonZeroU32;

use roster_core::{contact::Contact, SyncFailure};
use uuid::Uuid;

// ─── Phase ───────────────────────────────────────────────────────────────────

/// Where the controller's state machine currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncPhase {
  #[default]
  Idle,
  /// Waiting on the response for this page (1-based).
  FetchingPage(NonZeroU32),
  /// All pages arrived; the snapshot replacement is running.
  Committing,
  /// The last session ended without committing.
  Failed(SyncFailure),
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// A snapshot of the controller, published on every transition.
#[derive(Debug, Clone, Default)]
pub struct SyncStatus {
  pub(crate) phase:        SyncPhase,
  pub(crate) session:      Option<Uuid>,
  pub(crate) target_pages: u32,
  pub(crate) current_page: u32,
  pub(crate) accumulated:  Vec<Contact>,
}

impl SyncStatus {
  pub(crate) fn begin(session: Uuid, target_pages: NonZeroU32) -> Self {
    Self {
      phase:        SyncPhase::FetchingPage(NonZeroU32::MIN),
      session:      Some(session),
      target_pages: target_pages.get(),
      current_page: 1,
      accumulated:  Vec::new(),
    }
  }

  /// Discard the session, leaving `phase` behind.
  pub(crate) fn finish(&mut self, phase: SyncPhase) {
    *self = Self { phase, ..Self::default() };
  }

  pub fn phase(&self) -> &SyncPhase { &self.phase }

  /// Identifier of the running session, if any.
  pub fn session_id(&self) -> Option<Uuid> { self.session }

  /// True while fetching or committing. Replaces a global activity flag.
  pub fn in_progress(&self) -> bool {
    matches!(self.phase, SyncPhase::FetchingPage(_) | SyncPhase::Committing)
  }

  /// Page currently requested (or last requested while committing); 0 when
  /// no session is running.
  pub fn current_page(&self) -> u32 { self.current_page }

  pub fn target_pages(&self) -> u32 { self.target_pages }

  pub fn accumulated_count(&self) -> usize { self.accumulated.len() }

  pub fn contact_at(&self, offset: usize) -> Option<&Contact> { self.accumulated.get(offset) }

  /// Loading rows to reserve while a session accumulates:
  /// `target_pages × page_size − accumulated`, or 0 when idle.
  pub fn placeholder_rows(&self, page_size: usize) -> usize {
    if !self.in_progress() {
      return 0;
    }
    (self.target_pages as usize)
      .saturating_mul(page_size)
      .saturating_sub(self.accumulated.len())
  }

  /// The failure of the last session, if it failed.
  pub fn failure(&self) -> Option<&SyncFailure> {
    match &self.phase {
      SyncPhase::Failed(f) => Some(f),
      _ => None,
    }
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// Outcome of one session. Exactly one is sent per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
  /// The snapshot was replaced with `count` contacts.
  Completed { session: Uuid, count: usize },
  /// Nothing was committed.
  Failed { session: Uuid, failure: SyncFailure },
}

impl SyncEvent {
  pub fn session(&self) -> Uuid {
    match self {
      Self::Completed { session, .. } | Self::Failed { session, .. } => *session,
    }
  }

  /// User-facing failure text, `None` for a completed session.
  pub fn reason(&self) -> Option<String> {
    match self {
      Self::Completed { .. } => None,
      Self::Failed { failure, .. } => Some(failure.reason()),
    }
  }
}
