//! The interactive shell loop.
//!
//! Reads one command line at a time from stdin, parses it with the same
//! clap command tree as the one-shot mode, and prints the result. Command
//! failures are printed and the prompt returns; only `exit`, `quit` or EOF
//! ends the loop.

use std::io::{self, BufRead as _, Write as _};

use clap::Parser;
use roster_core::store::PersonStore;
use roster_ingest::Ingestor;

use crate::commands::{self, Command};

const PROMPT: &str = "roster> ";

/// Wrapper so a shell line parses against the same derive tree as the CLI.
#[derive(Parser)]
#[command(name = "roster", no_binary_name = true)]
struct ShellLine {
  #[command(subcommand)]
  command: Command,
}

pub async fn run<S: PersonStore>(
  store: S,
  ingestor: Ingestor<S>,
) -> anyhow::Result<()> {
  println!("roster shell — 'help' lists commands, 'exit' leaves.");

  let stdin = io::stdin();
  let mut lines = stdin.lock().lines();

  loop {
    print!("{PROMPT}");
    io::stdout().flush()?;

    let Some(line) = lines.next() else { break };
    let line = line?;
    let line = line.trim();
    if line.is_empty() {
      continue;
    }
    if line == "exit" || line == "quit" {
      break;
    }

    match ShellLine::try_parse_from(split_line(line)) {
      Ok(ShellLine { command }) => {
        match commands::dispatch(command, &store, &ingestor).await {
          Ok(output) => println!("{output}"),
          Err(e) => eprintln!("command failed: {e}"),
        }
      }
      // clap renders its own help and usage output.
      Err(e) => {
        let _ = e.print();
      }
    }
  }

  Ok(())
}

/// Split a command line on whitespace while respecting double-quoted
/// strings. Quotes group; they are not part of the token.
fn split_line(line: &str) -> Vec<String> {
  let mut tokens = Vec::new();
  let mut current = String::new();
  let mut in_token = false;
  let mut in_quotes = false;

  for c in line.chars() {
    match c {
      '"' => {
        in_quotes = !in_quotes;
        in_token = true;
      }
      c if c.is_whitespace() && !in_quotes => {
        if in_token {
          tokens.push(std::mem::take(&mut current));
          in_token = false;
        }
      }
      c => {
        current.push(c);
        in_token = true;
      }
    }
  }
  if in_token {
    tokens.push(current);
  }
  tokens
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::split_line;

  #[test]
  fn splits_on_whitespace() {
    assert_eq!(split_line("add Ada Lovelace"), vec![
      "add", "Ada", "Lovelace"
    ]);
    assert_eq!(split_line("  count  "), vec!["count"]);
  }

  #[test]
  fn quotes_group_words() {
    assert_eq!(split_line("add \"Ada Byron\" Lovelace"), vec![
      "add",
      "Ada Byron",
      "Lovelace"
    ]);
  }

  #[test]
  fn quoted_xml_stays_one_token() {
    assert_eq!(
      split_line("add-xml-text \"<persons> <person/> </persons>\""),
      vec!["add-xml-text", "<persons> <person/> </persons>"]
    );
  }

  #[test]
  fn empty_quotes_yield_an_empty_token() {
    assert_eq!(split_line("add \"\" Lovelace"), vec!["add", "", "Lovelace"]);
  }
}
