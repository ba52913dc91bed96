//! The schema walk over quick-xml events.
//!
//! Pipeline:
//!   raw &[u8]
//!     └─ Walker::next_node()   → structural Node stream
//!          └─ collection() / single() → grammar walk
//!               └─ person_fields()    → NewPerson

use std::borrow::Cow;

use quick_xml::{
  Reader,
  events::{BytesCData, BytesStart, BytesText, Event},
};
use roster_core::NewPerson;

use crate::{
  DocumentShape,
  error::{Error, Result},
};

pub(crate) fn parse_document(
  input: &[u8],
  shape: DocumentShape,
) -> Result<Vec<NewPerson>> {
  let mut walker = Walker::new(input);
  let persons = match shape {
    DocumentShape::Collection => walker.collection()?,
    DocumentShape::Single => vec![walker.single()?],
  };
  walker.expect_eof()?;
  Ok(persons)
}

// ─── Structural node stream ──────────────────────────────────────────────────

/// A reader event reduced to what the grammar cares about.
///
/// Comments and processing instructions are dropped, whitespace-only
/// character data between elements is dropped, and names are decoded.
enum Node {
  Start(String),
  Empty(String),
  End(String),
  Text(String),
  Eof,
}

impl Node {
  /// The error for a node found where the document root was required.
  fn into_root_error(self, expected: &'static str) -> Error {
    match self {
      Node::Start(found) | Node::Empty(found) => {
        Error::UnexpectedRoot { expected, found }
      }
      Node::End(found) => Error::Syntax(format!("unexpected </{found}>")),
      Node::Text(text) => Error::UnexpectedText(text),
      Node::Eof => Error::MissingRoot,
    }
  }
}

struct Walker<'a> {
  reader: Reader<&'a [u8]>,
  buf:    Vec<u8>,
}

impl<'a> Walker<'a> {
  fn new(input: &'a [u8]) -> Self {
    let mut reader = Reader::from_reader(input);
    // Invariant the walk relies on: every End event matches the innermost
    // open element, so mismatched close tags surface as reader errors.
    reader.config_mut().check_end_names = true;
    Self { reader, buf: Vec::new() }
  }

  /// Next structural node. `in_prolog` additionally lets the XML
  /// declaration and a DOCTYPE pass; anywhere else they are malformed.
  fn next_node(&mut self, in_prolog: bool) -> Result<Node> {
    loop {
      self.buf.clear();
      let node = match self.reader.read_event_into(&mut self.buf) {
        Ok(Event::Start(ref e)) => Node::Start(name_of(e)),
        Ok(Event::Empty(ref e)) => Node::Empty(name_of(e)),
        Ok(Event::End(ref e)) => {
          Node::End(String::from_utf8_lossy(e.name().as_ref()).into_owned())
        }
        Ok(Event::Text(ref e)) => {
          let text = unescape_text(e)?;
          if text.chars().all(|c| c.is_ascii_whitespace()) {
            continue;
          }
          Node::Text(text)
        }
        Ok(Event::CData(e)) => Node::Text(cdata_text(e)?),
        Ok(Event::Comment(_) | Event::PI(_)) => continue,
        Ok(Event::Decl(_) | Event::DocType(_)) if in_prolog => continue,
        Ok(Event::Decl(_) | Event::DocType(_)) => {
          return Err(Error::Syntax("misplaced declaration".to_string()));
        }
        Ok(Event::Eof) => Node::Eof,
        Err(e) => return Err(Error::Syntax(e.to_string())),
      };
      return Ok(node);
    }
  }

  // ── Grammar walk ──────────────────────────────────────────────────────

  /// `<persons>` root containing zero or more `<person>` children.
  fn collection(&mut self) -> Result<Vec<NewPerson>> {
    match self.next_node(true)? {
      Node::Start(ref name) if name == "persons" => {}
      Node::Empty(ref name) if name == "persons" => return Ok(Vec::new()),
      other => return Err(other.into_root_error("persons")),
    }

    let mut persons = Vec::new();
    loop {
      match self.next_node(false)? {
        Node::Start(ref name) if name == "person" => {
          persons.push(self.person_fields()?);
        }
        Node::Empty(ref name) if name == "person" => {
          persons.push(NewPerson::default());
        }
        // End-name matching is enforced by the reader: this is </persons>.
        Node::End(_) => return Ok(persons),
        Node::Start(name) | Node::Empty(name) => {
          return Err(Error::UnexpectedElement(name));
        }
        Node::Text(text) => return Err(Error::UnexpectedText(text)),
        Node::Eof => return Err(Error::UnexpectedEof("persons".to_string())),
      }
    }
  }

  /// `<person>` root with the name fields directly under it.
  fn single(&mut self) -> Result<NewPerson> {
    match self.next_node(true)? {
      Node::Start(ref name) if name == "person" => self.person_fields(),
      Node::Empty(ref name) if name == "person" => Ok(NewPerson::default()),
      other => Err(other.into_root_error("person")),
    }
  }

  /// Children of an open `<person>`, up to and including its close tag.
  ///
  /// A repeated field keeps the last occurrence.
  fn person_fields(&mut self) -> Result<NewPerson> {
    let mut person = NewPerson::default();
    loop {
      match self.next_node(false)? {
        Node::Start(ref name) if name == "firstName" => {
          person.first_name = Some(self.field_text("firstName")?);
        }
        Node::Empty(ref name) if name == "firstName" => {
          person.first_name = Some(String::new());
        }
        Node::Start(ref name) if name == "surname" => {
          person.surname = Some(self.field_text("surname")?);
        }
        Node::Empty(ref name) if name == "surname" => {
          person.surname = Some(String::new());
        }
        // End-name matching is enforced by the reader: this is </person>.
        Node::End(_) => return Ok(person),
        Node::Start(name) | Node::Empty(name) => {
          return Err(Error::UnexpectedElement(name));
        }
        Node::Text(text) => return Err(Error::UnexpectedText(text)),
        Node::Eof => return Err(Error::UnexpectedEof("person".to_string())),
      }
    }
  }

  /// Character data of an open field element, up to its close tag.
  ///
  /// Raw events, not [`Walker::next_node`]: inside a field every bit of
  /// text is significant, whitespace included.
  fn field_text(&mut self, field: &'static str) -> Result<String> {
    let mut text = String::new();
    loop {
      self.buf.clear();
      match self.reader.read_event_into(&mut self.buf) {
        Ok(Event::Text(ref e)) => text.push_str(&unescape_text(e)?),
        Ok(Event::CData(e)) => text.push_str(&cdata_text(e)?),
        // End-name matching is enforced by the reader.
        Ok(Event::End(_)) => return Ok(text),
        Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
          return Err(Error::UnexpectedElement(name_of(e)));
        }
        Ok(Event::Comment(_) | Event::PI(_)) => {}
        Ok(Event::Decl(_) | Event::DocType(_)) => {
          return Err(Error::Syntax("misplaced declaration".to_string()));
        }
        Ok(Event::Eof) => return Err(Error::UnexpectedEof(field.to_string())),
        Err(e) => return Err(Error::Syntax(e.to_string())),
      }
    }
  }

  /// Only insignificant content may remain after the root closes.
  fn expect_eof(&mut self) -> Result<()> {
    match self.next_node(false)? {
      Node::Eof => Ok(()),
      _ => Err(Error::TrailingContent),
    }
  }
}

// ─── Event helpers ───────────────────────────────────────────────────────────

fn name_of(e: &BytesStart<'_>) -> String {
  String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn unescape_text(e: &BytesText<'_>) -> Result<String> {
  e.unescape()
    .map(Cow::into_owned)
    .map_err(|err| Error::Syntax(err.to_string()))
}

fn cdata_text(e: BytesCData<'_>) -> Result<String> {
  String::from_utf8(e.into_inner().into_owned())
    .map_err(|err| Error::Syntax(err.to_string()))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
