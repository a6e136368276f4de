//! The `PageFetcher` and `SnapshotStore` traits and the snapshot read handle.
//!
//! Backends implement these (`roster-store-sqlite`, the HTTP feed client in
//! `roster-cli`). The sync controller depends on the abstractions only.

use std::{future::Future, num::NonZeroU32, sync::Arc};

use chrono::{DateTime, Utc};

use crate::contact::{Contact, PersistedContact};

// ─── Remote feed ─────────────────────────────────────────────────────────────

/// One request per page against the remote contact feed.
///
/// Calls for one session are issued strictly in sequence. A failed call is
/// never retried; its `Display` text becomes the failure reason.
pub trait PageFetcher: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the contacts on `page` (1-based).
  fn fetch(
    &self,
    page: NonZeroU32,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;
}

// ─── Snapshot handle ─────────────────────────────────────────────────────────

/// A read handle over one committed snapshot.
///
/// The handle is a complete copy of a single generation, so a holder keeps
/// seeing the same records after a later `replace_all`. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct SnapshotView {
  contacts:     Arc<[PersistedContact]>,
  generation:   u64,
  committed_at: Option<DateTime<Utc>>,
}

impl SnapshotView {
  pub fn new(
    contacts: Vec<PersistedContact>,
    generation: u64,
    committed_at: Option<DateTime<Utc>>,
  ) -> Self {
    Self { contacts: contacts.into(), generation, committed_at }
  }

  pub fn len(&self) -> usize { self.contacts.len() }

  pub fn is_empty(&self) -> bool { self.contacts.is_empty() }

  pub fn get(&self, index: usize) -> Option<&PersistedContact> { self.contacts.get(index) }

  pub fn iter(&self) -> std::slice::Iter<'_, PersistedContact> { self.contacts.iter() }

  pub fn as_slice(&self) -> &[PersistedContact] { &self.contacts }

  /// Look a contact up by identifier.
  pub fn find(&self, id: &str) -> Option<&PersistedContact> {
    self.contacts.iter().find(|c| c.id() == id)
  }

  /// Number of successful commits behind this snapshot; 0 when never synced.
  pub fn generation(&self) -> u64 { self.generation }

  pub fn committed_at(&self) -> Option<DateTime<Utc>> { self.committed_at }
}

impl<'a> IntoIterator for &'a SnapshotView {
  type Item = &'a PersistedContact;
  type IntoIter = std::slice::Iter<'a, PersistedContact>;

  fn into_iter(self) -> Self::IntoIter { self.contacts.iter() }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Local persisted contact set, replaced wholesale on every successful sync.
///
/// There is no field-level write path: `replace_all` is the only mutation.
pub trait SnapshotStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the current snapshot. An uninitialised store yields an empty view.
  fn current_view(
    &self,
  ) -> impl Future<Output = Result<SnapshotView, Self::Error>> + Send + '_;

  /// Atomically replace every persisted contact with `items`.
  ///
  /// On error nothing is committed and the previous snapshot stays visible.
  fn replace_all(
    &self,
    items: Vec<Contact>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
