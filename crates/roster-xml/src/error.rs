//! Error types for the roster-xml document codec.

use thiserror::Error;

/// A rejected document.
///
/// Every variant means the same thing to callers — the document is malformed
/// for the configured shape — but each names what was actually found so log
/// lines stay diagnosable.
#[derive(Debug, Error)]
pub enum Error {
  #[error("xml syntax error: {0}")]
  Syntax(String),

  #[error("document contains no root element")]
  MissingRoot,

  #[error("unexpected root element <{found}>, expected <{expected}>")]
  UnexpectedRoot { expected: &'static str, found: String },

  #[error("unexpected element <{0}>")]
  UnexpectedElement(String),

  #[error("unexpected character data {0:?}")]
  UnexpectedText(String),

  #[error("document ended before <{0}> was closed")]
  UnexpectedEof(String),

  #[error("unexpected content after the document root")]
  TrailingContent,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
