//! List model — decides which set the presentation layer renders.

use crate::{contact::PersistedContact, search::SearchIndexView, store::SnapshotView};

/// The rows behind the contact list.
///
/// Shows the full snapshot, or the search results while search is active.
/// While a sync is accumulating, extra placeholder rows may be reserved past
/// the end of the active view.
#[derive(Debug, Clone, Default)]
pub struct ContactList {
  snapshot:      SnapshotView,
  search:        SearchIndexView,
  search_active: bool,
  placeholders:  usize,
}

impl ContactList {
  pub fn new(snapshot: SnapshotView) -> Self { Self { snapshot, ..Self::default() } }

  pub fn snapshot(&self) -> &SnapshotView { &self.snapshot }

  /// Swap in a newly committed snapshot, re-running any active search.
  pub fn set_snapshot(&mut self, snapshot: SnapshotView) {
    self.snapshot = snapshot;
    if self.search_active {
      self.search.refresh(&self.snapshot);
    }
  }

  pub fn is_search_active(&self) -> bool { self.search_active }

  pub fn activate_search(&mut self) {
    self.search_active = true;
    self.search.refresh(&self.snapshot);
  }

  pub fn set_query(&mut self, query: impl Into<String>) {
    self.search.set_query(query, &self.snapshot);
  }

  pub fn deactivate_search(&mut self) {
    self.search_active = false;
    self.search.deactivate();
  }

  /// The rows currently on screen, excluding placeholders.
  pub fn active_view(&self) -> &[PersistedContact] {
    if self.search_active {
      self.search.results()
    } else {
      self.snapshot.as_slice()
    }
  }

  /// Reserve `count` loading rows after the active view.
  pub fn set_placeholders(&mut self, count: usize) { self.placeholders = count; }

  pub fn row_count(&self) -> usize { self.active_view().len() + self.placeholders }

  /// True only for the reserved rows between the active view and `row_count`.
  pub fn is_placeholder_row(&self, index: usize) -> bool {
    (self.active_view().len()..self.row_count()).contains(&index)
  }

  /// The contact at `index`, or `None` for a placeholder row.
  pub fn row(&self, index: usize) -> Option<&PersistedContact> { self.active_view().get(index) }

  pub fn find(&self, id: &str) -> Option<&PersistedContact> { self.snapshot.find(id) }
}
