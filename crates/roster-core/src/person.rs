//! Person — the sole domain entity.
//!
//! A person is a numeric identifier plus two optional name fields. Absence
//! of a field is a valid state, distinct from a present-but-empty value.

use serde::{Deserialize, Serialize};

/// A persisted person row.
///
/// `id` is assigned by the store on create and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:         i64,
  pub first_name: Option<String>,
  pub surname:    Option<String>,
}

/// A person that has not been persisted yet.
///
/// Produced by callers and by the document parser; the store assigns the
/// identifier on create. Parsed-but-unpersisted values never carry an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
  pub first_name: Option<String>,
  pub surname:    Option<String>,
}

impl NewPerson {
  pub fn new(
    first_name: impl Into<String>,
    surname: impl Into<String>,
  ) -> Self {
    Self {
      first_name: Some(first_name.into()),
      surname:    Some(surname.into()),
    }
  }
}
