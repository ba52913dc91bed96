//! The command entry points behind the shell.
//!
//! Each function turns a store interaction into the exact line the shell
//! prints. "Not found" is an answer here, not an error — `S::Error` is
//! reserved for backend failures, which the caller reports without leaving
//! the shell.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use roster_core::{
  person::{NewPerson, Person},
  store::PersonStore,
};
use roster_ingest::{Ingestor, SourceKind};

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Add a person; prints the assigned id.
  Add { first_name: String, surname: String },
  /// Rewrite both name fields of an existing person.
  Edit {
    #[arg(allow_negative_numbers = true)]
    id:         i64,
    first_name: String,
    surname:    String,
  },
  /// Delete a person by id.
  Delete {
    #[arg(allow_negative_numbers = true)]
    id: i64,
  },
  /// Print the number of stored persons.
  Count,
  /// List all persons in id order.
  List,
  /// Ingest persons from an XML file.
  AddXmlFile { path: PathBuf },
  /// Ingest persons from inline XML text.
  AddXmlText { xml: String },
}

/// Run one command to completion and return its display output.
pub async fn dispatch<S: PersonStore>(
  command: Command,
  store: &S,
  ingestor: &Ingestor<S>,
) -> Result<String, S::Error> {
  match command {
    Command::Add { first_name, surname } => {
      add(store, &first_name, &surname).await
    }
    Command::Edit { id, first_name, surname } => {
      edit(store, id, &first_name, &surname).await
    }
    Command::Delete { id } => delete(store, id).await,
    Command::Count => count(store).await,
    Command::List => list(store).await,
    Command::AddXmlFile { path } => Ok(add_xml_file(ingestor, &path).await),
    Command::AddXmlText { xml } => Ok(add_xml_text(ingestor, &xml).await),
  }
}

pub async fn add<S: PersonStore>(
  store: &S,
  first_name: &str,
  surname: &str,
) -> Result<String, S::Error> {
  tracing::debug!(first_name, surname, "add");
  let person = store.create(NewPerson::new(first_name, surname)).await?;
  Ok(person.id.to_string())
}

pub async fn edit<S: PersonStore>(
  store: &S,
  id: i64,
  first_name: &str,
  surname: &str,
) -> Result<String, S::Error> {
  tracing::debug!(id, first_name, surname, "edit");
  match store.find_by_id(id).await? {
    Some(mut person) => {
      person.first_name = Some(first_name.to_string());
      person.surname = Some(surname.to_string());
      store.save(person).await?;
      Ok("Edit success".to_string())
    }
    None => Ok(format!("Person id {id} does not exist")),
  }
}

pub async fn delete<S: PersonStore>(
  store: &S,
  id: i64,
) -> Result<String, S::Error> {
  tracing::debug!(id, "delete");
  if store.delete_by_id(id).await? {
    Ok("Delete success".to_string())
  } else {
    Ok(format!("Person id {id} does not exist"))
  }
}

pub async fn count<S: PersonStore>(store: &S) -> Result<String, S::Error> {
  Ok(store.count().await?.to_string())
}

pub async fn list<S: PersonStore>(store: &S) -> Result<String, S::Error> {
  let persons = store.find_all().await?;
  Ok(
    persons
      .iter()
      .map(render_person)
      .collect::<Vec<_>>()
      .join("\n"),
  )
}

pub async fn add_xml_file<S: PersonStore>(
  ingestor: &Ingestor<S>,
  path: &Path,
) -> String {
  tracing::debug!(path = %path.display(), "add_xml_file");
  let outcome = ingestor.ingest_path(path).await;
  outcome.render(ingestor.shape(), SourceKind::File)
}

pub async fn add_xml_text<S: PersonStore>(
  ingestor: &Ingestor<S>,
  xml: &str,
) -> String {
  tracing::debug!(xml, "add_xml_text");
  let outcome = ingestor.ingest_text(xml).await;
  outcome.render(ingestor.shape(), SourceKind::Inline)
}

fn render_person(person: &Person) -> String {
  format!(
    "{:>6}  {} {}",
    person.id,
    person.first_name.as_deref().unwrap_or(""),
    person.surname.as_deref().unwrap_or("")
  )
}

// ─── Tests ───────────────────────────────────────────────────────────────────
