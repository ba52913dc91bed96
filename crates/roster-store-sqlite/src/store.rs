//! [`SqliteStore`] — the SQLite implementation of [`PersonStore`].

use std::path::Path;

use roster_core::{
  person::{NewPerson, Person},
  store::PersonStore,
};
use rusqlite::OptionalExtension as _;

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store backed by a single SQLite file.
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
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = Error;

  async fn create(&self, input: NewPerson) -> Result<Person> {
    let person = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons (first_name, surname) VALUES (?1, ?2)",
          rusqlite::params![input.first_name, input.surname],
        )?;
        Ok(Person {
          id:         conn.last_insert_rowid(),
          first_name: input.first_name,
          surname:    input.surname,
        })
      })
      .await?;
    Ok(person)
  }

  async fn find_by_id(&self, id: i64) -> Result<Option<Person>> {
    let person = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT person_id, first_name, surname
               FROM persons WHERE person_id = ?1",
              rusqlite::params![id],
              row_to_person,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(person)
  }

  async fn save(&self, person: Person) -> Result<Person> {
    let person = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons (person_id, first_name, surname)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(person_id) DO UPDATE
             SET first_name = excluded.first_name,
                 surname    = excluded.surname",
          rusqlite::params![person.id, person.first_name, person.surname],
        )?;
        Ok(person)
      })
      .await?;
    Ok(person)
  }

  async fn delete_by_id(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let rows = conn.execute(
          "DELETE FROM persons WHERE person_id = ?1",
          rusqlite::params![id],
        )?;
        Ok(rows > 0)
      })
      .await?;
    Ok(deleted)
  }

  async fn count(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM persons", [], |row| {
          row.get(0)
        })?)
      })
      .await?;
    Ok(count as u64)
  }

  async fn find_all(&self) -> Result<Vec<Person>> {
    let persons = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT person_id, first_name, surname
           FROM persons ORDER BY person_id",
        )?;
        let rows = stmt
          .query_map([], row_to_person)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(persons)
  }
}

fn row_to_person(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person {
    id:         row.get(0)?,
    first_name: row.get(1)?,
    surname:    row.get(2)?,
  })
}
