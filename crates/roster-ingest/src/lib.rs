//! Ingestion coordinator for roster.
//!
//! Resolves a document source (file path or inline text), runs the
//! [`roster_xml`] parser, persists the parsed records through any
//! [`PersonStore`], and builds the user-visible result. Every failure is
//! converted into an [`IngestOutcome`] variant here — nothing escalates to
//! the command surface as an error.

use std::{io, path::Path};

use roster_core::store::PersonStore;
use roster_xml::DocumentShape;

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Where the document bytes came from.
///
/// Only affects the wording of rendered failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
  /// Resolved from a file path.
  File,
  /// Supplied inline as command text.
  Inline,
}

/// The result of one ingestion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
  /// The document parsed and every record was created, in document order.
  Persisted { count: usize, last_id: Option<i64> },
  /// The path did not resolve to a readable file. Nothing was persisted.
  SourceNotFound,
  /// The parser rejected the document. Nothing was persisted.
  MalformedDocument,
  /// Reading or persisting failed partway. The first `persisted` records
  /// stay committed; there is no rollback and no retry.
  Failed { persisted: usize },
}

impl IngestOutcome {
  /// Render the outcome for display.
  ///
  /// Collection deployments get a status line; single deployments get the
  /// assigned identifier, `0` when nothing was created.
  pub fn render(&self, shape: DocumentShape, source: SourceKind) -> String {
    match shape {
      DocumentShape::Collection => match self {
        IngestOutcome::Persisted { count, .. } => {
          format!("{count} person(s) added")
        }
        IngestOutcome::SourceNotFound => "File not found".to_string(),
        IngestOutcome::MalformedDocument | IngestOutcome::Failed { .. } => {
          match source {
            SourceKind::File => "Error processing xml file".to_string(),
            SourceKind::Inline => "Error processing xml".to_string(),
          }
        }
      },
      DocumentShape::Single => self.assigned_id().to_string(),
    }
  }

  /// The identifier assigned to the single created record, or `0` when
  /// parsing or persistence did not produce one.
  pub fn assigned_id(&self) -> i64 {
    match self {
      IngestOutcome::Persisted { last_id: Some(id), .. } => *id,
      _ => 0,
    }
  }
}

// ─── Coordinator ─────────────────────────────────────────────────────────────

/// Orchestrates parse + persist for the two bulk-ingestion commands.
///
/// Holds the store and the document shape the deployment was configured
/// with. The shape is fixed at construction; there is no sniffing.
pub struct Ingestor<S> {
  store: S,
  shape: DocumentShape,
}

impl<S: PersonStore> Ingestor<S> {
  pub fn new(store: S, shape: DocumentShape) -> Self {
    Self { store, shape }
  }

  pub fn shape(&self) -> DocumentShape { self.shape }

  /// Ingest the document at `path`.
  ///
  /// A missing path is a reportable outcome, not an error; any other read
  /// failure counts as a processing failure.
  pub async fn ingest_path(&self, path: impl AsRef<Path>) -> IngestOutcome {
    let path = path.as_ref();
    match tokio::fs::read(path).await {
      Ok(bytes) => self.ingest_bytes(&bytes).await,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        tracing::debug!(path = %path.display(), "ingestion source not found");
        IngestOutcome::SourceNotFound
      }
      Err(e) => {
        tracing::error!(
          path = %path.display(),
          error = %e,
          "failed to read ingestion source"
        );
        IngestOutcome::Failed { persisted: 0 }
      }
    }
  }

  /// Ingest `text` directly as the document. Cannot produce
  /// [`IngestOutcome::SourceNotFound`].
  pub async fn ingest_text(&self, text: &str) -> IngestOutcome {
    self.ingest_bytes(text.as_bytes()).await
  }

  async fn ingest_bytes(&self, bytes: &[u8]) -> IngestOutcome {
    let drafts = match roster_xml::parse(bytes, self.shape) {
      Ok(drafts) => drafts,
      Err(e) => {
        tracing::debug!(error = %e, "document rejected");
        return IngestOutcome::MalformedDocument;
      }
    };

    let total = drafts.len();
    let mut last_id = None;
    for (persisted, draft) in drafts.into_iter().enumerate() {
      match self.store.create(draft).await {
        Ok(person) => last_id = Some(person.id),
        Err(e) => {
          tracing::error!(
            error = %e,
            persisted,
            total,
            "create failed mid-ingestion"
          );
          return IngestOutcome::Failed { persisted };
        }
      }
    }

    IngestOutcome::Persisted { count: total, last_id }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{
    io::Write as _,
    sync::{Arc, Mutex},
  };

  use roster_core::{NewPerson, Person};
  use roster_store_sqlite::SqliteStore;

  use super::*;

  async fn store() -> SqliteStore {
    SqliteStore::open_in_memory().await.expect("in-memory store")
  }

  fn ingestor(store: SqliteStore, shape: DocumentShape) -> Ingestor<SqliteStore> {
    Ingestor::new(store, shape)
  }

  // ── Collection mode, inline text ──────────────────────────────────────

  #[tokio::test]
  async fn text_with_two_persons_persists_both() {
    let s = store().await;
    let ing = ingestor(s.clone(), DocumentShape::Collection);

    let outcome = ing
      .ingest_text(
        "<persons>\
           <person><firstName>A</firstName><surname>B</surname></person>\
           <person><firstName>C</firstName><surname>D</surname></person>\
         </persons>",
      )
      .await;

    assert_eq!(
      outcome.render(DocumentShape::Collection, SourceKind::Inline),
      "2 person(s) added"
    );
    assert_eq!(s.count().await.unwrap(), 2);

    let all = s.find_all().await.unwrap();
    assert_eq!(all[0].first_name.as_deref(), Some("A"));
    assert_eq!(all[0].surname.as_deref(), Some("B"));
    assert_eq!(all[1].first_name.as_deref(), Some("C"));
    assert_eq!(all[1].surname.as_deref(), Some("D"));
  }

  #[tokio::test]
  async fn empty_collection_adds_nothing_and_is_not_an_error() {
    let s = store().await;
    let ing = ingestor(s.clone(), DocumentShape::Collection);

    let outcome = ing.ingest_text("<persons></persons>").await;

    assert_eq!(outcome, IngestOutcome::Persisted { count: 0, last_id: None });
    assert_eq!(
      outcome.render(DocumentShape::Collection, SourceKind::Inline),
      "0 person(s) added"
    );
    assert_eq!(s.count().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn broken_markup_persists_nothing() {
    let s = store().await;
    let ing = ingestor(s.clone(), DocumentShape::Collection);

    let outcome = ing
      .ingest_text("<persons><person><firstName>first<surname>last")
      .await;

    assert_eq!(outcome, IngestOutcome::MalformedDocument);
    assert_eq!(
      outcome.render(DocumentShape::Collection, SourceKind::Inline),
      "Error processing xml"
    );
    assert_eq!(
      outcome.render(DocumentShape::Collection, SourceKind::File),
      "Error processing xml file"
    );
    assert_eq!(s.count().await.unwrap(), 0);
  }

  // ── Path resolution ───────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_path_is_reported_not_escalated() {
    let s = store().await;
    let ing = ingestor(s.clone(), DocumentShape::Collection);

    let outcome = ing.ingest_path("/no/such/roster-import.xml").await;

    assert_eq!(outcome, IngestOutcome::SourceNotFound);
    assert_eq!(
      outcome.render(DocumentShape::Collection, SourceKind::File),
      "File not found"
    );
    assert_eq!(outcome.render(DocumentShape::Single, SourceKind::File), "0");
    assert_eq!(s.count().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn file_source_round_trips() {
    let s = store().await;
    let ing = ingestor(s.clone(), DocumentShape::Collection);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file
      .write_all(
        b"<persons><person>\
            <firstName>firstXmlFile1</firstName>\
            <surname>lastXmlFile1</surname>\
          </person></persons>",
      )
      .unwrap();

    let outcome = ing.ingest_path(file.path()).await;

    assert_eq!(
      outcome.render(DocumentShape::Collection, SourceKind::File),
      "1 person(s) added"
    );
    let all = s.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].first_name.as_deref(), Some("firstXmlFile1"));
  }

  // ── Single mode ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn single_document_returns_the_assigned_id() {
    let s = store().await;
    let ing = ingestor(s.clone(), DocumentShape::Single);

    let outcome = ing
      .ingest_text("<person><firstName>X</firstName><surname>Y</surname></person>")
      .await;

    let id = outcome.assigned_id();
    assert!(id > 0);
    assert_eq!(
      outcome.render(DocumentShape::Single, SourceKind::Inline),
      id.to_string()
    );

    let person = s.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(person.first_name.as_deref(), Some("X"));
    assert_eq!(person.surname.as_deref(), Some("Y"));
  }

  #[tokio::test]
  async fn single_mode_failures_render_the_zero_sentinel() {
    let s = store().await;
    let ing = ingestor(s.clone(), DocumentShape::Single);

    let outcome = ing.ingest_text("<person><firstName>X<surname>Y").await;
    assert_eq!(outcome, IngestOutcome::MalformedDocument);
    assert_eq!(outcome.assigned_id(), 0);
    assert_eq!(outcome.render(DocumentShape::Single, SourceKind::Inline), "0");
    assert_eq!(s.count().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn single_mode_rejects_collection_documents() {
    let s = store().await;
    let ing = ingestor(s.clone(), DocumentShape::Single);

    let outcome = ing.ingest_text("<persons></persons>").await;
    assert_eq!(outcome, IngestOutcome::MalformedDocument);
    assert_eq!(s.count().await.unwrap(), 0);
  }

  // ── Partial persistence ───────────────────────────────────────────────

  #[derive(Debug, thiserror::Error)]
  #[error("store offline")]
  struct Offline;

  /// Test double that accepts `capacity` creates and then fails.
  #[derive(Clone)]
  struct FlakyStore {
    rows:     Arc<Mutex<Vec<Person>>>,
    capacity: usize,
  }

  impl FlakyStore {
    fn with_capacity(capacity: usize) -> Self {
      Self { rows: Arc::new(Mutex::new(Vec::new())), capacity }
    }
  }

  impl PersonStore for FlakyStore {
    type Error = Offline;

    async fn create(&self, input: NewPerson) -> Result<Person, Offline> {
      let mut rows = self.rows.lock().unwrap();
      if rows.len() >= self.capacity {
        return Err(Offline);
      }
      let person = Person {
        id:         rows.len() as i64 + 1,
        first_name: input.first_name,
        surname:    input.surname,
      };
      rows.push(person.clone());
      Ok(person)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Person>, Offline> {
      Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn save(&self, person: Person) -> Result<Person, Offline> {
      let mut rows = self.rows.lock().unwrap();
      rows.retain(|p| p.id != person.id);
      rows.push(person.clone());
      Ok(person)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, Offline> {
      let mut rows = self.rows.lock().unwrap();
      let before = rows.len();
      rows.retain(|p| p.id != id);
      Ok(rows.len() < before)
    }

    async fn count(&self) -> Result<u64, Offline> {
      Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn find_all(&self) -> Result<Vec<Person>, Offline> {
      Ok(self.rows.lock().unwrap().clone())
    }
  }

  #[tokio::test]
  async fn mid_ingestion_failure_keeps_earlier_records() {
    let flaky = FlakyStore::with_capacity(1);
    let ing = Ingestor::new(flaky.clone(), DocumentShape::Collection);

    let outcome = ing
      .ingest_text(
        "<persons>\
           <person><firstName>kept</firstName></person>\
           <person><firstName>lost</firstName></person>\
         </persons>",
      )
      .await;

    assert_eq!(outcome, IngestOutcome::Failed { persisted: 1 });
    assert_eq!(
      outcome.render(DocumentShape::Collection, SourceKind::Inline),
      "Error processing xml"
    );

    // The committed record survives the failure.
    let rows = flaky.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].first_name.as_deref(), Some("kept"));
  }
}
