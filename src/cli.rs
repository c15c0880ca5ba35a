//! Command-line interface definition for ThinkTank
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chatting, managing sessions, and preferences.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ThinkTank - terminal client for the ThinkTank AI Assistant
///
/// Chat with the assistant service; sessions are kept in a local store
/// and survive restarts.
#[derive(Parser, Debug, Clone)]
#[command(name = "thinktank")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the session store location
    ///
    /// Takes precedence over `THINKTANK_STORAGE_PATH` and the config file.
    #[arg(long)]
    pub storage_path: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for ThinkTank
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat
    Chat {
        /// Start in a new session instead of the most recent one
        #[arg(short, long)]
        new: bool,
    },

    /// Manage stored chat sessions
    Sessions {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Check that the assistant service is reachable
    Health,

    /// Show or set the theme preference
    Theme {
        /// New theme (dark, light, or toggle); omit to show the current one
        value: Option<String>,
    },

    /// Show or update the stored user profile
    Whoami {
        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New email
        #[arg(long)]
        email: Option<String>,

        /// New role label
        #[arg(long)]
        role: Option<String>,
    },

    /// Remove all stored sessions and preferences
    SignOut,
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List sessions, newest first
    List,

    /// Print the messages of a session
    Show {
        /// Session id or unique id prefix
        id: String,
    },

    /// Rename a session
    Rename {
        /// Session id or unique id prefix
        id: String,

        /// New title
        title: String,
    },

    /// Delete a session
    Delete {
        /// Session id or unique id prefix
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            storage_path: None,
            command: Commands::Chat { new: false },
        }
    }
}
