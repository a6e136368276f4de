//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Temperament is stored as its
//! feed spelling.

use chrono::{DateTime, Utc};
use roster_core::contact::{Contact, EducationPeriod, PersistedContact, Temperament};

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values for one `contacts` insert, built before entering the
/// connection thread.
pub struct ContactRow {
  pub contact_id:      String,
  pub name:            String,
  pub phone:           String,
  pub phone_digits:    String,
  pub height:          f64,
  pub biography:       String,
  pub temperament:     String,
  pub education_start: String,
  pub education_end:   Option<String>,
}

impl ContactRow {
  pub fn from_persisted(p: PersistedContact) -> Self {
    let phone_digits = p.phone_digits().to_owned();
    let c = p.into_contact();
    Self {
      contact_id: c.id,
      name: c.name,
      phone: c.phone,
      phone_digits,
      height: c.height,
      biography: c.biography,
      temperament: c.temperament.into(),
      education_start: encode_dt(c.education_period.start),
      education_end: c.education_period.end.map(encode_dt),
    }
  }
}

/// Raw values read directly from a `contacts` row.
pub struct RawContact {
  pub contact_id:      String,
  pub name:            String,
  pub phone:           String,
  pub height:          f64,
  pub biography:       String,
  pub temperament:     String,
  pub education_start: String,
  pub education_end:   Option<String>,
}

impl RawContact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      contact_id:      row.get(0)?,
      name:            row.get(1)?,
      phone:           row.get(2)?,
      height:          row.get(3)?,
      biography:       row.get(4)?,
      temperament:     row.get(5)?,
      education_start: row.get(6)?,
      education_end:   row.get(7)?,
    })
  }

  /// Rebuild the domain value; the digits-only phone is derived again here.
  pub fn into_persisted(self) -> Result<PersistedContact> {
    if self.contact_id.is_empty() {
      return Err(Error::Decode("empty contact_id".into()));
    }
    let contact = Contact {
      id:               self.contact_id,
      name:             self.name,
      phone:            self.phone,
      height:           self.height,
      biography:        self.biography,
      temperament:      Temperament::from(self.temperament),
      education_period: EducationPeriod {
        start: decode_dt(&self.education_start)?,
        end:   self.education_end.as_deref().map(decode_dt).transpose()?,
      },
    };
    Ok(PersistedContact::from(contact))
  }
}

/// Raw values from the single `snapshot_meta` row.
pub struct RawMeta {
  pub generation:   i64,
  pub committed_at: String,
}

impl RawMeta {
  pub fn decode(self) -> Result<(u64, DateTime<Utc>)> {
    let generation = u64::try_from(self.generation)
      .map_err(|_| Error::Decode(format!("negative generation: {}", self.generation)))?;
    Ok((generation, decode_dt(&self.committed_at)?))
  }
}
