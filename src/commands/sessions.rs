use crate::cli::SessionCommand;
use crate::commands::{display, open_session_store};
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;

/// Handle `sessions` subcommands
pub fn handle_sessions(config: &Config, command: SessionCommand) -> Result<()> {
    let mut store = open_session_store(config)?;

    match command {
        SessionCommand::List => {
            display::print_sessions(store.sessions(), store.active_id());
            println!(
                "Use {} then {} to continue a session.",
                "thinktank chat".cyan(),
                "/select <ID>".cyan()
            );
            println!();
        }
        SessionCommand::Show { id } => {
            let id = store.resolve_id(&id)?;
            if let Some(session) = store.get(&id) {
                display::print_session(session);
            }
        }
        SessionCommand::Rename { id, title } => {
            let id = store.resolve_id(&id)?;
            store.rename_session(&id, title.trim())?;
            println!("{}", format!("Renamed session {}", id).green());
        }
        SessionCommand::Delete { id } => {
            let id = store.resolve_id(&id)?;
            store.delete_session(&id)?;
            println!("{}", format!("Deleted session {}", id).green());
        }
    }

    Ok(())
}
