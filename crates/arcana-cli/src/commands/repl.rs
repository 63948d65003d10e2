//! Interactive session.
//!
//! Deck generation and readings run as background tasks, so the prompt
//! stays usable while they are in flight and a second request is answered
//! with the session's busy notice.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use arcana_core::presenter::UserEvent;
use arcana_core::spread::all_spreads;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::app;
use crate::commands::spreads;

const COMMANDS: [&str; 7] = ["generate", "spreads", "deck", "read", "discard", "help", "quit"];

/// A parsed REPL line.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Generate,
    Spreads,
    Deck,
    Read { spread_id: String, query: String },
    Discard,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map(|(head, rest)| (head, rest.trim()))
        .unwrap_or((line, ""));

    match head {
        "generate" => Ok(ReplCommand::Generate),
        "spreads" => Ok(ReplCommand::Spreads),
        "deck" => Ok(ReplCommand::Deck),
        "discard" => Ok(ReplCommand::Discard),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" => Ok(ReplCommand::Quit),
        "read" => {
            let (spread_id, query) = rest
                .split_once(char::is_whitespace)
                .map(|(id, query)| (id, query.trim()))
                .unwrap_or((rest, ""));
            if spread_id.is_empty() {
                return Err("Usage: read <spread> [question]".to_string());
            }
            Ok(ReplCommand::Read {
                spread_id: spread_id.to_string(),
                query: query.to_string(),
            })
        }
        other => Err(format!("Unknown command: {other}. Type 'help'.")),
    }
}

/// Completion for command names and, after `read `, spread ids.
#[derive(Clone)]
struct ReplHelper {
    spread_ids: Vec<String>,
}

impl ReplHelper {
    fn new() -> Self {
        Self {
            spread_ids: all_spreads().map(|s| s.id.to_string()).collect(),
        }
    }

    fn candidates(&self, line: &str) -> (usize, Vec<String>) {
        if let Some(partial) = line.strip_prefix("read ") {
            if partial.contains(char::is_whitespace) {
                return (0, vec![]);
            }
            let matches = self
                .spread_ids
                .iter()
                .filter(|id| id.starts_with(partial))
                .cloned()
                .collect();
            return ("read ".len(), matches);
        }
        if line.contains(char::is_whitespace) {
            return (0, vec![]);
        }
        let matches = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| cmd.to_string())
            .collect();
        (0, matches)
    }
}

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|m| Pair {
                display: m.clone(),
                replacement: m,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match line.split_whitespace().next() {
            Some(head) if COMMANDS.contains(&head) && line.starts_with(head) => {
                let rest = &line[head.len()..];
                Owned(format!("{}{}", head.bright_cyan(), rest))
            }
            _ => Borrowed(line),
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() {
            return None;
        }
        let (start, matches) = self.candidates(line);
        let typed = &line[start..];
        matches
            .first()
            .filter(|m| m.len() > typed.len())
            .map(|m| m[typed.len()..].to_string())
    }
}

impl Validator for ReplHelper {}

fn print_help() {
    println!("{}", "Commands:".bright_magenta());
    println!("  generate                 summon a new deck (runs in the background)");
    println!("  spreads                  list the spreads");
    println!("  deck                     show the current deck");
    println!("  read <spread> [question] draw a spread and consult the reader");
    println!("  discard                  throw the deck away");
    println!("  help                     show this help");
    println!("  quit                     leave");
}

pub async fn run(config_dir: Option<&Path>) -> Result<ExitCode> {
    let usecase = Arc::new(app::build_usecase(config_dir).await?);

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ReplHelper::new()));

    println!("{}", "=== ARCANA ===".bright_magenta().bold());
    println!(
        "{}",
        "Type 'generate' to summon a deck, 'help' for commands, 'quit' to leave.".bright_black()
    );
    println!();

    loop {
        match rl.readline("arcana> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{}", message.yellow());
                        continue;
                    }
                };

                match command {
                    ReplCommand::Quit => {
                        println!("{}", "The cards go dark.".bright_green());
                        break;
                    }
                    ReplCommand::Help => print_help(),
                    ReplCommand::Spreads => spreads::list(),
                    ReplCommand::Deck => usecase.show_deck(),
                    ReplCommand::Discard => usecase.discard_deck(),
                    ReplCommand::Generate => {
                        let usecase = Arc::clone(&usecase);
                        tokio::spawn(async move {
                            usecase.handle(UserEvent::GenerateDeckRequested).await;
                        });
                    }
                    ReplCommand::Read { spread_id, query } => {
                        let usecase = Arc::clone(&usecase);
                        tokio::spawn(async move {
                            usecase
                                .handle(UserEvent::ReadingRequested { spread_id, query })
                                .await;
                        });
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
