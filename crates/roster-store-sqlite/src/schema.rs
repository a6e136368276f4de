//! SQL schema for the Roster SQLite store.
//!
//! Applied at connection startup when the file's `PRAGMA user_version` is
//! below [`SCHEMA_VERSION`]; files written by a newer version are refused.

/// Value of `PRAGMA user_version` once [`SCHEMA`] has been applied.
pub const SCHEMA_VERSION: i64 = 1;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- The current snapshot. Rows are only ever written by a full replacement
-- inside one transaction; `position` preserves feed order.
CREATE TABLE IF NOT EXISTS contacts (
    position          INTEGER PRIMARY KEY,
    contact_id        TEXT NOT NULL UNIQUE,
    name              TEXT NOT NULL,
    phone             TEXT NOT NULL,
    phone_digits      TEXT NOT NULL,   -- derived from phone on every write
    height            REAL NOT NULL,
    biography         TEXT NOT NULL,
    temperament       TEXT NOT NULL,
    education_start   TEXT NOT NULL,   -- RFC 3339 UTC
    education_end     TEXT             -- NULL = present
);

-- Single-row bookkeeping for the committed snapshot.
CREATE TABLE IF NOT EXISTS snapshot_meta (
    id            INTEGER PRIMARY KEY CHECK (id = 1),
    generation    INTEGER NOT NULL,
    committed_at  TEXT NOT NULL
);

PRAGMA user_version = 1;
";
