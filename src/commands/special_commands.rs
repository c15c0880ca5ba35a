//! Special commands parser for interactive chat
//!
//! Lines starting with `/` manage sessions instead of being sent to the
//! assistant. Command names are case-insensitive.

use colored::Colorize;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands available during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new session and switch to it
    NewSession,

    /// List all sessions
    ListSessions,

    /// Switch to the session with the given id or prefix
    SelectSession(String),

    /// Rename a session
    RenameSession { id: String, title: String },

    /// Delete a session
    DeleteSession(String),

    /// Print the active session's messages
    ShowHistory,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; send the line to the assistant
    None,
}

/// Parse a line of chat input
///
/// # Errors
///
/// Returns `CommandError` for unknown commands or missing arguments
///
/// # Examples
///
/// ```
/// use thinktank::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewSession);
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_lowercase();
    let rest = parts.next().map(str::trim).unwrap_or_default();

    let require = |usage: &str| -> Result<String, CommandError> {
        if rest.is_empty() {
            Err(CommandError::MissingArgument {
                command: name.clone(),
                usage: usage.to_string(),
            })
        } else {
            Ok(rest.to_string())
        }
    };

    match name.as_str() {
        "/new" => Ok(SpecialCommand::NewSession),
        "/list" | "/sessions" => Ok(SpecialCommand::ListSessions),
        "/select" | "/switch" => Ok(SpecialCommand::SelectSession(require("/select <id>")?)),
        "/delete" => Ok(SpecialCommand::DeleteSession(require("/delete <id>")?)),
        "/rename" => {
            let usage = "/rename <id> <title>";
            let args = require(usage)?;
            let mut args = args.splitn(2, char::is_whitespace);
            let id = args.next().unwrap_or_default().to_string();
            let title = args.next().map(str::trim).unwrap_or_default().to_string();
            if title.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: name.clone(),
                    usage: usage.to_string(),
                });
            }
            Ok(SpecialCommand::RenameSession { id, title })
        }
        "/history" => Ok(SpecialCommand::ShowHistory),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(name.clone())),
    }
}

/// Print the list of special commands
pub fn print_help() {
    println!("\n{}", "Chat commands:".bold());
    println!("  {}                  Start a new session", "/new".cyan());
    println!("  {}                 List sessions", "/list".cyan());
    println!("  {}          Switch to a session", "/select <id>".cyan());
    println!("  {} Rename a session", "/rename <id> <title>".cyan());
    println!("  {}          Delete a session", "/delete <id>".cyan());
    println!("  {}              Show the current session", "/history".cyan());
    println!("  {}                 Show this help", "/help".cyan());
    println!("  {}                 Leave the chat", "/exit".cyan());
    println!();
    println!("Session ids may be shortened to any unique prefix.\n");
}
