use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use kindred_application::{CompanionConversation, ResponseGenerator};
use kindred_core::config::StorageBackend;
use kindred_core::dialogue::{RandomSelector, SeededSelector, StageResponse, TemplateSelector};
use kindred_infrastructure::open_scoped_store;

const COMMANDS: &[&str] = &["/context", "/leave"];

/// Command-line overrides for the chat session.
pub struct ChatOptions {
    pub session: Option<String>,
    pub seed: Option<u64>,
    pub store: Option<StorageBackend>,
    pub config: Option<PathBuf>,
}

/// Rustyline helper completing and highlighting slash commands.
#[derive(Clone)]
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }

        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ChatHelper {}

fn print_response(response: &StageResponse) {
    println!("{}", format!("[{}]", response.stage).bright_magenta());
    for line in response.message.lines() {
        println!("{}", line.bright_blue());
    }
    println!();
}

/// Runs the interactive chat REPL.
pub async fn run(options: ChatOptions) -> Result<()> {
    let mut config = super::load_config(options.config.as_deref())?;
    if let Some(backend) = options.store {
        config.storage.backend = backend;
    }
    tracing::debug!(backend = ?config.storage.backend, "opening session store");

    let backend = open_scoped_store(&config.storage).context("Failed to open session store")?;
    let selector: Box<dyn TemplateSelector> = match options.seed.or(config.chat.seed) {
        Some(seed) => Box::new(SeededSelector::new(seed)),
        None => Box::new(RandomSelector),
    };
    let generator = ResponseGenerator::from_config(&config.engine, selector);

    let mut conversation = match options.session {
        Some(session_id) => CompanionConversation::resume(session_id, generator, backend),
        None => {
            let session_id = uuid::Uuid::new_v4().to_string();
            CompanionConversation::start(session_id, generator, backend)
        }
    };
    let thinking_delay = Duration::from_millis(config.chat.thinking_delay_ms);

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!("{}", "=== Kindred ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Session {}", conversation.session_id()).bright_black()
    );
    println!(
        "{}",
        "Share what's on your mind. '/context' shows the session, '/leave' ends it and forgets it, 'quit' ends it and keeps it."
            .bright_black()
    );
    if conversation.is_storage_degraded() {
        println!(
            "{}",
            "Session storage is unavailable; this conversation will not be saved.".yellow()
        );
    }
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Take care. Your session has been kept.".bright_green());
                    break;
                }
                if trimmed == "/leave" {
                    conversation.leave();
                    println!("{}", "Take care. This session has been cleared.".bright_green());
                    return Ok(());
                }
                if trimmed == "/context" {
                    let json = serde_json::to_string_pretty(conversation.context())?;
                    println!("{}", json.bright_black());
                    continue;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(trimmed);

                let response = conversation.respond(trimmed);
                if !thinking_delay.is_zero() {
                    tokio::time::sleep(thinking_delay).await;
                }
                print_response(&response);
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
