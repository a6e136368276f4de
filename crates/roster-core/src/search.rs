//! Search over the persisted snapshot.
//!
//! A record matches when its name contains the query case-insensitively, or
//! when its digits-only phone contains the query text as typed. The query is
//! not digit-normalised, so `"(123"` never matches a phone.

use crate::{contact::PersistedContact, store::SnapshotView};

/// Whether `contact` matches `query`.
pub fn matches(contact: &PersistedContact, query: &str) -> bool {
  if query.is_empty() {
    return true;
  }
  contact.name().to_lowercase().contains(&query.to_lowercase())
    || contact.phone_digits().contains(query)
}

/// Every record of `view` matching `query`, in snapshot order.
pub fn filter(query: &str, view: &SnapshotView) -> Vec<PersistedContact> {
  view.iter().filter(|c| matches(c, query)).cloned().collect()
}

/// Search state for an active search surface.
///
/// Results are recomputed in full on every query or snapshot change and are
/// never written back to the store.
#[derive(Debug, Clone, Default)]
pub struct SearchIndexView {
  query:   String,
  results: Vec<PersistedContact>,
}

impl SearchIndexView {
  pub fn new() -> Self { Self::default() }

  pub fn query(&self) -> &str { &self.query }

  pub fn results(&self) -> &[PersistedContact] { &self.results }

  /// Replace the query and recompute against `view`.
  pub fn set_query(&mut self, query: impl Into<String>, view: &SnapshotView) {
    self.query = query.into();
    self.refresh(view);
  }

  /// Recompute the current query against a (possibly newer) snapshot.
  pub fn refresh(&mut self, view: &SnapshotView) { self.results = filter(&self.query, view); }

  /// Drop the query and results.
  pub fn deactivate(&mut self) {
    self.query.clear();
    self.results.clear();
  }
}
