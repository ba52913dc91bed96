//! `roster` — person records shell backed by SQLite.
//!
//! # Usage
//!
//! ```text
//! roster add Ada Lovelace
//! roster add-xml-file people.xml
//! roster --format single add-xml-text "<person><firstName>A</firstName></person>"
//! roster                                # interactive shell
//! ```

mod commands;
mod shell;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use roster_ingest::Ingestor;
use roster_store_sqlite::SqliteStore;
use roster_xml::DocumentShape;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use commands::Command;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "roster", version, about = "Person records shell")]
struct Cli {
  /// Path to a TOML config file (store_path, format).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// SQLite database path (default: roster.db).
  #[arg(long, env = "ROSTER_STORE")]
  store: Option<PathBuf>,

  /// Which ingestion document format this deployment accepts.
  #[arg(long, value_enum, env = "ROSTER_FORMAT")]
  format: Option<FormatArg>,

  /// Command to run; with none, the interactive shell starts.
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FormatArg {
  /// `<persons>` collection documents.
  Collection,
  /// One `<person>` per document.
  Single,
}

impl From<FormatArg> for DocumentShape {
  fn from(arg: FormatArg) -> Self {
    match arg {
      FormatArg::Collection => DocumentShape::Collection,
      FormatArg::Single => DocumentShape::Single,
    }
  }
}

// ─── Config file ─────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  store_path: Option<PathBuf>,
  format:     Option<FormatArg>,
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let file_cfg: ConfigFile = if let Some(path) = &cli.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let store_path = cli
    .store
    .or(file_cfg.store_path)
    .unwrap_or_else(|| PathBuf::from("roster.db"));
  let shape = cli
    .format
    .or(file_cfg.format)
    .map(DocumentShape::from)
    .unwrap_or(DocumentShape::Collection);

  let store = SqliteStore::open(&store_path).await.with_context(|| {
    format!("failed to open store at {}", store_path.display())
  })?;
  let ingestor = Ingestor::new(store.clone(), shape);

  match cli.command {
    Some(command) => {
      let output = commands::dispatch(command, &store, &ingestor)
        .await
        .context("command failed")?;
      println!("{output}");
    }
    None => shell::run(store, ingestor).await?,
  }

  Ok(())
}
