//! [`SqliteStore`] — the SQLite implementation of [`SnapshotStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use roster_core::{
  contact::{Contact, PersistedContact},
  store::{SnapshotStore, SnapshotView},
};

use crate::{
  encode::{encode_dt, ContactRow, RawContact, RawMeta},
  schema::{SCHEMA, SCHEMA_VERSION},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster snapshot store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let found = self
      .conn
      .call(|conn| {
        let found: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if found < SCHEMA_VERSION {
          conn.execute_batch(SCHEMA)?;
        }
        Ok(found)
      })
      .await?;

    if found > SCHEMA_VERSION {
      return Err(Error::UnsupportedSchema { found, supported: SCHEMA_VERSION });
    }
    Ok(())
  }
}

// ─── SnapshotStore impl ──────────────────────────────────────────────────────

impl SnapshotStore for SqliteStore {
  type Error = crate::Error;

  async fn current_view(&self) -> Result<SnapshotView> {
    // Rows and meta are read inside one transaction so they always describe
    // the same committed generation.
    let (raws, meta): (Vec<RawContact>, Option<RawMeta>) = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;

        let raws = {
          let mut stmt = tx.prepare(
            "SELECT contact_id, name, phone, height, biography, temperament,
                    education_start, education_end
             FROM contacts
             ORDER BY position",
          )?;
          stmt
            .query_map([], RawContact::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let meta = tx
          .query_row(
            "SELECT generation, committed_at FROM snapshot_meta WHERE id = 1",
            [],
            |row| {
              Ok(RawMeta {
                generation:   row.get(0)?,
                committed_at: row.get(1)?,
              })
            },
          )
          .optional()?;

        tx.commit()?;
        Ok((raws, meta))
      })
      .await?;

    let contacts = raws
      .into_iter()
      .map(RawContact::into_persisted)
      .collect::<Result<Vec<_>>>()?;

    let (generation, committed_at) = match meta {
      Some(m) => {
        let (generation, at) = m.decode()?;
        (generation, Some(at))
      }
      None => (0, None),
    };

    Ok(SnapshotView::new(contacts, generation, committed_at))
  }

  async fn replace_all(&self, items: Vec<Contact>) -> Result<()> {
    let rows: Vec<ContactRow> = items
      .into_iter()
      .map(PersistedContact::from)
      .map(ContactRow::from_persisted)
      .collect();
    let committed_at = encode_dt(Utc::now());

    // Dropping `tx` on any early return rolls the whole replacement back.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM contacts", [])?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO contacts (
               contact_id, name, phone, phone_digits, height, biography,
               temperament, education_start, education_end
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          )?;
          for row in &rows {
            stmt.execute(rusqlite::params![
              row.contact_id,
              row.name,
              row.phone,
              row.phone_digits,
              row.height,
              row.biography,
              row.temperament,
              row.education_start,
              row.education_end,
            ])?;
          }
        }
        tx.execute(
          "INSERT INTO snapshot_meta (id, generation, committed_at) VALUES (1, 1, ?1)
           ON CONFLICT (id) DO UPDATE
             SET generation   = generation + 1,
                 committed_at = excluded.committed_at",
          rusqlite::params![committed_at],
        )?;

        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }
}
