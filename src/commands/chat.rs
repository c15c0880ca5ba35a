//! Interactive chat handler
//!
//! Opens the session store, connects the dispatcher to the assistant
//! service, and runs a readline loop. Slash commands manage sessions;
//! any other line is sent to the assistant.

use crate::assistant::{AssistantClient, HttpAssistant};
use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::commands::{display, open_session_store};
use crate::config::Config;
use crate::dispatch::{ChatDispatcher, IgnoredReason, SendOutcome};
use crate::error::Result;
use crate::storage::KeyValueStore;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;

/// Start interactive chat
///
/// # Arguments
///
/// * `config` - Global configuration
/// * `new_session` - Start in a fresh session instead of the most recent one
pub async fn run_chat(config: Config, new_session: bool) -> Result<()> {
    let mut store = open_session_store(&config)?;
    if new_session {
        store.create_session()?;
    }

    let assistant: Arc<dyn AssistantClient> = Arc::new(HttpAssistant::new(config.assistant)?);
    let endpoint = assistant.endpoint();
    let dispatcher = ChatDispatcher::new(assistant, store);

    let mut rl = DefaultEditor::new()?;

    print_welcome_banner(&endpoint);
    if let Some(session) = dispatcher.store().lock().await.active() {
        display::print_session(session);
    }

    loop {
        let prompt = {
            let store = dispatcher.store();
            let store = store.lock().await;
            let title = store.active().map(|s| s.title.clone()).unwrap_or_default();
            format!("{} {} ", format!("[{}]", title).dimmed(), ">>".cyan().bold())
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                if handle_line(&dispatcher, trimmed).await == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                tracing::error!("Readline error: {}", e);
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Whether the chat loop keeps reading after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Exit,
}

/// Run one line of input; errors are printed and never end the loop
async fn handle_line<B: KeyValueStore>(
    dispatcher: &ChatDispatcher<B>,
    line: &str,
) -> LoopControl {
    let command = match parse_special_command(line) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            return LoopControl::Continue;
        }
    };

    let result = match command {
        SpecialCommand::Exit => return LoopControl::Exit,
        SpecialCommand::None => send_and_print(dispatcher, line).await,
        other => handle_special_command(dispatcher, other).await,
    };

    if let Err(e) = result {
        tracing::error!("Chat command failed: {:#}", e);
        eprintln!("{}", e.to_string().red());
    }

    LoopControl::Continue
}

async fn send_and_print<B: KeyValueStore>(
    dispatcher: &ChatDispatcher<B>,
    text: &str,
) -> Result<()> {
    println!("{}", "Thinking...".dimmed());

    match dispatcher.send(text).await? {
        SendOutcome::Answered(reply) => display::print_message(&reply),
        SendOutcome::Failed(reply) => {
            println!("{}", "Assistant".magenta().bold());
            println!("{}\n", reply.content.red());
        }
        SendOutcome::Ignored(IgnoredReason::InFlight) => {
            println!("{}", "Still waiting for the previous answer.".yellow());
        }
        SendOutcome::Ignored(reason) => {
            tracing::debug!("Send ignored: {:?}", reason);
        }
    }

    Ok(())
}

async fn handle_special_command<B: KeyValueStore>(
    dispatcher: &ChatDispatcher<B>,
    command: SpecialCommand,
) -> Result<()> {
    let store = dispatcher.store();
    let mut store = store.lock().await;

    match command {
        SpecialCommand::NewSession => {
            let session = store.create_session()?;
            println!("{}", format!("Started new session {}", session.id).green());
        }
        SpecialCommand::ListSessions => {
            display::print_sessions(store.sessions(), store.active_id());
        }
        SpecialCommand::SelectSession(prefix) => {
            let id = store.resolve_id(&prefix)?;
            store.select_session(&id)?;
            if let Some(session) = store.active() {
                display::print_session(session);
            }
        }
        SpecialCommand::RenameSession { id, title } => {
            let id = store.resolve_id(&id)?;
            store.rename_session(&id, title)?;
            println!("{}", format!("Renamed session {}", id).green());
        }
        SpecialCommand::DeleteSession(prefix) => {
            let id = store.resolve_id(&prefix)?;
            store.delete_session(&id)?;
            println!("{}", format!("Deleted session {}", id).green());
        }
        SpecialCommand::ShowHistory => {
            if let Some(session) = store.active() {
                display::print_session(session);
            }
        }
        SpecialCommand::Help => print_help(),
        SpecialCommand::Exit | SpecialCommand::None => {}
    }

    Ok(())
}

fn print_welcome_banner(endpoint: &str) {
    println!("{}", "ThinkTank AI Assistant".bold().cyan());
    println!("Connected to {}", endpoint.cyan());
    println!("Type {} for commands, {} to leave.", "/help".cyan(), "/exit".cyan());
}
