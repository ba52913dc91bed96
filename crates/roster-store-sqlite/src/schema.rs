//! SQL schema for the roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Identity lives here and nowhere else: person_id is assigned on insert,
-- and AUTOINCREMENT keeps ids from being reused after a delete.
CREATE TABLE IF NOT EXISTS persons (
    person_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT,
    surname     TEXT
);

PRAGMA user_version = 1;
";
