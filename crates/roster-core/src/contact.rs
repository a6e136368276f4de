//! Contact types — the remote record and its persisted counterpart.
//!
//! A [`Contact`] is what the remote feed hands us. A [`PersistedContact`] is
//! the same record as held in the local snapshot, carrying the derived
//! digits-only phone used by search.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Temperament ─────────────────────────────────────────────────────────────

/// Temperament as reported by the feed.
///
/// Unknown values are preserved verbatim in [`Temperament::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Temperament {
  Melancholic,
  Phlegmatic,
  Sanguine,
  Choleric,
  Other(String),
}

impl Temperament {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Melancholic => "melancholic",
      Self::Phlegmatic => "phlegmatic",
      Self::Sanguine => "sanguine",
      Self::Choleric => "choleric",
      Self::Other(s) => s,
    }
  }
}

impl From<String> for Temperament {
  fn from(s: String) -> Self {
    match s.as_str() {
      "melancholic" => Self::Melancholic,
      "phlegmatic" => Self::Phlegmatic,
      "sanguine" => Self::Sanguine,
      "choleric" => Self::Choleric,
      _ => Self::Other(s),
    }
  }
}

impl From<Temperament> for String {
  fn from(t: Temperament) -> Self {
    match t {
      Temperament::Other(s) => s,
      known => known.as_str().to_owned(),
    }
  }
}

impl fmt::Display for Temperament {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

// ─── Education ───────────────────────────────────────────────────────────────

/// Education period. A missing `end` means "present".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationPeriod {
  pub start: DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end:   Option<DateTime<Utc>>,
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A contact as delivered by one page of the remote feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
  /// Stable across syncs; unique within a snapshot.
  pub id:               String,
  pub name:             String,
  pub phone:            String,
  pub height:           f64,
  pub biography:        String,
  pub temperament:      Temperament,
  pub education_period: EducationPeriod,
}

/// Strip every character that is not an ASCII digit.
///
/// `"+7 (123) 456-7890"` becomes `"71234567890"`.
pub fn phone_digits(phone: &str) -> String {
  phone.chars().filter(char::is_ascii_digit).collect()
}

// ─── PersistedContact ────────────────────────────────────────────────────────

/// A contact as stored in the local snapshot.
///
/// The digits-only phone is computed when the value is built and cannot be
/// set independently, so it always matches `contact().phone`.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedContact {
  contact:      Contact,
  phone_digits: String,
}

impl PersistedContact {
  pub fn contact(&self) -> &Contact { &self.contact }

  pub fn into_contact(self) -> Contact { self.contact }

  pub fn id(&self) -> &str { &self.contact.id }

  pub fn name(&self) -> &str { &self.contact.name }

  pub fn phone(&self) -> &str { &self.contact.phone }

  /// The search key derived from [`Contact::phone`].
  pub fn phone_digits(&self) -> &str { &self.phone_digits }
}

impl From<Contact> for PersistedContact {
  fn from(contact: Contact) -> Self {
    let phone_digits = phone_digits(&contact.phone);
    Self { contact, phone_digits }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn digits_strip_everything_but_digits() {
    assert_eq!(phone_digits("+7 (123) 456-7890"), "71234567890");
    assert_eq!(phone_digits("no digits"), "");
    assert_eq!(phone_digits("٣12"), "12");
  }

  #[test]
  fn decodes_feed_record() {
    let json = r#"{
      "id": "5c20e3c5a8d7e7b2b1f0c3a1",
      "name": "Leta Garner",
      "phone": "+7 (918) 548-3443",
      "height": 173.3,
      "biography": "Ipsum dolor.",
      "temperament": "sanguine",
      "educationPeriod": {
        "start": "2002-03-26T09:36:52-06:00",
        "end": "2012-07-02T08:54:24-06:00"
      }
    }"#;

    let contact: Contact = serde_json::from_str(json).unwrap();
    assert_eq!(contact.name, "Leta Garner");
    assert_eq!(contact.temperament, Temperament::Sanguine);
    assert_eq!(contact.education_period.start.to_rfc3339(), "2002-03-26T15:36:52+00:00");
    assert!(contact.education_period.end.is_some());
  }

  #[test]
  fn missing_end_means_present_and_unknown_temperament_is_kept() {
    let json = r#"{
      "id": "a", "name": "N", "phone": "1", "height": 1.0, "biography": "",
      "temperament": "stoic",
      "educationPeriod": { "start": "2002-03-26T09:36:52Z" }
    }"#;

    let contact: Contact = serde_json::from_str(json).unwrap();
    assert_eq!(contact.education_period.end, None);
    assert_eq!(contact.temperament, Temperament::Other("stoic".into()));
    assert_eq!(String::from(contact.temperament), "stoic");
  }

  #[test]
  fn persisted_contact_derives_digits() {
    let json = r#"{
      "id": "a", "name": "N", "phone": "8 (800) 555-35-35", "height": 1.0,
      "biography": "", "temperament": "choleric",
      "educationPeriod": { "start": "2002-03-26T09:36:52Z" }
    }"#;
    let contact: Contact = serde_json::from_str(json).unwrap();
    let persisted = PersistedContact::from(contact);
    assert_eq!(persisted.phone_digits(), "88005553535");
    assert_eq!(persisted.phone(), "8 (800) 555-35-35");
  }
}
