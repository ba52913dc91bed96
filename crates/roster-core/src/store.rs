//! The `PersonStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-ingest`, `roster-cli`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::person::{NewPerson, Person};

/// Abstraction over a roster store backend.
///
/// Identity is owned by the store: `create` assigns the id, and no other
/// operation ever changes one. "Not found" is expressed in the return types
/// (`Option`, `bool`), not through the error channel — `Self::Error` is
/// reserved for backend failures.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new person and return it with its assigned id.
  fn create(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn find_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Upsert `person` by id and return the stored value.
  ///
  /// Used by edit: the row keeps its id, both name fields are rewritten.
  fn save(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Delete a person by id. Returns `false` if no such row existed.
  fn delete_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Number of stored persons.
  fn count(&self)
  -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// All stored persons, ordered by id.
  fn find_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;
}
