//! Presentation state and plain-text rendering.

use std::io::{self, Write};

use roster_core::{contact::PersistedContact, list::ContactList, store::SnapshotView};
use roster_sync::SyncEvent;
use uuid::Uuid;

/// Top-level presentation state.
pub struct App {
  /// Rows behind the list: full snapshot or search results.
  pub list:       ContactList,
  /// One-line status message shown under the list.
  pub status_msg: String,
  /// Session whose progress is currently shown.
  session:        Option<Uuid>,
}

impl App {
  pub fn new(snapshot: SnapshotView) -> Self {
    Self { list: ContactList::new(snapshot), status_msg: String::new(), session: None }
  }

  /// Show only contacts matching `query`.
  pub fn search(&mut self, query: &str) {
    self.list.activate_search();
    self.list.set_query(query);
  }

  /// Follow the controller's progress. Returns `true` when a new session
  /// began, which is worth a redraw.
  pub fn on_sync_progress(&mut self, session: Option<Uuid>, placeholders: usize) -> bool {
    self.list.set_placeholders(placeholders);
    let began = session.is_some() && session != self.session;
    self.session = session;
    if began {
      self.status_msg = "Refreshing…".into();
    }
    began
  }

  /// Record a session outcome; completed sessions swap in `snapshot`.
  pub fn on_sync_event(&mut self, event: &SyncEvent, snapshot: Option<SnapshotView>) {
    match event {
      SyncEvent::Completed { count, .. } => {
        if let Some(view) = snapshot {
          self.list.set_snapshot(view);
        }
        self.list.set_placeholders(0);
        self.status_msg = format!("Synced {count} contacts.");
      }
      SyncEvent::Failed { failure, .. } => {
        self.list.set_placeholders(0);
        self.status_msg = format!("Error: {failure}");
      }
    }
  }

  // ── Rendering ─────────────────────────────────────────────────────────────

  /// Write the active view, one contact per line, then the status line.
  pub fn render_list(&self, out: &mut impl Write) -> io::Result<()> {
    let shown = self.list.active_view().len();
    let total = self.list.snapshot().len();

    if self.list.is_search_active() {
      writeln!(out, "Contacts ({shown}/{total})")?;
    } else {
      writeln!(out, "Contacts ({total})")?;
    }

    for index in 0..self.list.row_count() {
      match self.list.row(index) {
        Some(c) => writeln!(
          out,
          "  {:<28} {:<20} {}",
          c.name(),
          c.phone(),
          c.contact().temperament
        )?,
        None if self.list.is_placeholder_row(index) => writeln!(out, "  …")?,
        None => {}
      }
    }

    if self.list.row_count() == 0 {
      let hint = if self.list.is_search_active() {
        "No matching contacts."
      } else {
        "No contacts yet. Run `roster sync`."
      };
      writeln!(out, "  {hint}")?;
    }

    if let Some(at) = self.list.snapshot().committed_at() {
      writeln!(out, "Last synced {}", at.format("%Y-%m-%d %H:%M UTC"))?;
    }
    if !self.status_msg.is_empty() {
      writeln!(out, "{}", self.status_msg)?;
    }
    Ok(())
  }
}

/// Write every field of one contact.
pub fn render_detail(contact: &PersistedContact, out: &mut impl Write) -> io::Result<()> {
  let c = contact.contact();
  let period = &c.education_period;
  let end = period
    .end
    .map(|d| d.format("%d.%m.%Y").to_string())
    .unwrap_or_else(|| "present".into());

  writeln!(out, "{}", c.name)?;
  writeln!(out, "  {:<12} {}", "id", c.id)?;
  writeln!(out, "  {:<12} {}", "phone", c.phone)?;
  writeln!(out, "  {:<12} {}", "height", c.height)?;
  writeln!(out, "  {:<12} {}", "temperament", c.temperament)?;
  writeln!(
    out,
    "  {:<12} {} - {}",
    "education",
    period.start.format("%d.%m.%Y"),
    end
  )?;
  if !c.biography.is_empty() {
    writeln!(out)?;
    writeln!(out, "{}", c.biography)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use roster_core::{
    SyncFailure,
    contact::{Contact, EducationPeriod, Temperament},
  };

  use super::*;

  fn person(id: &str, name: &str, phone: &str) -> Contact {
    Contact {
      id:               id.into(),
      name:             name.into(),
      phone:            phone.into(),
      height:           181.2,
      biography:        "Writes compilers for fun.".into(),
      temperament:      Temperament::Sanguine,
      education_period: EducationPeriod {
        start: Utc.with_ymd_and_hms(2003, 9, 1, 0, 0, 0).unwrap(),
        end:   None,
      },
    }
  }

  fn snapshot() -> SnapshotView {
    SnapshotView::new(
      vec![
        person("1", "Alice", "+7 (123) 456-7890").into(),
        person("2", "Bob", "456-7890").into(),
      ],
      1,
      Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
    )
  }

  fn rendered(app: &App) -> String {
    let mut buf = Vec::new();
    app.render_list(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
  }

  #[test]
  fn list_shows_every_contact() {
    let out = rendered(&App::new(snapshot()));
    assert!(out.starts_with("Contacts (2)"));
    assert!(out.contains("Alice"));
    assert!(out.contains("Bob"));
    assert!(out.contains("Last synced 2024-05-01 12:00 UTC"));
  }

  #[test]
  fn search_narrows_the_list() {
    let mut app = App::new(snapshot());
    app.search("123");
    let out = rendered(&app);
    assert!(out.starts_with("Contacts (1/2)"));
    assert!(out.contains("Alice"));
    assert!(!out.contains("Bob"));
  }

  #[test]
  fn placeholders_render_as_loading_rows() {
    let mut app = App::new(SnapshotView::default());
    app.list.set_placeholders(2);
    let out = rendered(&app);
    assert_eq!(out.matches("  …").count(), 2);
  }

  #[test]
  fn failure_event_sets_error_status() {
    let mut app = App::new(snapshot());
    app.list.set_placeholders(3);
    let event = SyncEvent::Failed {
      session: Default::default(),
      failure: SyncFailure::Fetch { reason: "timeout".into() },
    };
    app.on_sync_event(&event, None);
    assert_eq!(app.status_msg, "Error: timeout");
    assert_eq!(app.list.row_count(), 2);
  }

  #[test]
  fn every_new_session_reserves_loading_rows() {
    let mut app = App::new(snapshot());
    let first = Uuid::new_v4();

    assert!(app.on_sync_progress(Some(first), 4));
    assert_eq!(app.status_msg, "Refreshing…");
    assert_eq!(app.list.row_count(), 6);

    // Progress within the same session shrinks the reservation quietly.
    assert!(!app.on_sync_progress(Some(first), 1));
    assert_eq!(app.list.row_count(), 3);

    let done = SyncEvent::Completed { session: first, count: 2 };
    app.on_sync_event(&done, Some(snapshot()));
    assert!(!app.on_sync_progress(None, 0));
    assert_eq!(app.list.row_count(), 2);

    // A later refresh is a new session and gets placeholders again.
    assert!(app.on_sync_progress(Some(Uuid::new_v4()), 5));
    assert_eq!(rendered(&app).matches("  …").count(), 5);
  }

  #[test]
  fn detail_shows_open_ended_education() {
    let mut buf = Vec::new();
    render_detail(&person("1", "Alice", "1").into(), &mut buf).unwrap();
    let out = String::from_utf8(buf).unwrap();
    assert!(out.contains("01.09.2003 - present"));
    assert!(out.contains("sanguine"));
  }
}
