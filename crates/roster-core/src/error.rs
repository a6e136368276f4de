//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// `start()` was called while a session is still fetching or committing.
  #[error("a sync session is already in progress")]
  AlreadyInProgress,

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Generic reason reported for any failure of the commit transaction.
pub const PERSISTENCE_FAILURE_REASON: &str = "could not save contacts to local storage";

/// Why a sync session ended without committing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncFailure {
  /// A page request failed. The reason is the fetcher's message, verbatim.
  #[error("{reason}")]
  Fetch { reason: String },

  /// The snapshot replacement failed; the prior snapshot is intact.
  #[error("{}", PERSISTENCE_FAILURE_REASON)]
  Persistence { detail: String },
}

impl SyncFailure {
  /// The human-readable text shown to the user.
  pub fn reason(&self) -> String { self.to_string() }
}
