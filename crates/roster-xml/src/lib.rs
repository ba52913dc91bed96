//! Person-document codec for roster.
//!
//! Deserializes the two supported XML document shapes into
//! [`roster_core::NewPerson`] values. Pure synchronous; no store or I/O
//! dependencies.
//!
//! The walk is an explicit schema walk: the grammar for the configured
//! [`DocumentShape`] is spelled out element by element, and anything outside
//! it is rejected. There is no best-effort extraction from broken markup.
//!
//! # Quick start
//!
//! ```
//! use roster_xml::{DocumentShape, parse};
//!
//! let doc = b"<persons><person><firstName>Ada</firstName></person></persons>";
//! let people = parse(doc, DocumentShape::Collection).unwrap();
//! assert_eq!(people.len(), 1);
//! assert_eq!(people[0].first_name.as_deref(), Some("Ada"));
//! ```

pub mod error;
mod parse;

pub use error::{Error, Result};
use roster_core::NewPerson;

/// Which document grammar the parser accepts.
///
/// Fixed per deployment; the parser never sniffs the root to pick a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
  /// Root `<persons>` wrapping zero or more `<person>` children.
  Collection,
  /// Root `<person>` with the name fields directly under it.
  Single,
}

/// Parse `input` as a person document of the given `shape`.
///
/// Returns the parsed persons in document order: zero or more in
/// [`DocumentShape::Collection`], exactly one in [`DocumentShape::Single`]
/// (a bare root still counts as one person with both fields unset).
///
/// Field text is preserved exactly as written — no trimming, no case
/// changes. Entity references and CDATA sections are decoded.
pub fn parse(input: &[u8], shape: DocumentShape) -> Result<Vec<NewPerson>> {
  parse::parse_document(input, shape)
}
