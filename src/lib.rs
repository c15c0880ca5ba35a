//! ThinkTank - client library for the ThinkTank AI Assistant
//!
//! This library keeps chat sessions in a local key-value store and sends
//! user messages to the assistant service, recording every answer (or the
//! reason there is none) in the conversation.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Messages, sessions, title derivation, and the session store
//! - `storage`: Key-value persistence backends (in-memory, sled)
//! - `assistant`: Assistant service client abstraction and HTTP client
//! - `dispatch`: Single-flight send flow
//! - `preferences`: Theme, user profile, and sign-out
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` and `commands`: Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use thinktank::{ChatDispatcher, Config, HttpAssistant, SessionStore};
//! use thinktank::storage::SledStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let store = SessionStore::open(SledStore::open(config.storage.resolve_path()?)?)?;
//!     let assistant = Arc::new(HttpAssistant::new(config.assistant.clone())?);
//!     let dispatcher = ChatDispatcher::new(assistant, store);
//!     dispatcher.send("Hello!").await?;
//!     Ok(())
//! }
//! ```

pub mod assistant;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod preferences;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use assistant::{AssistantClient, HttpAssistant};
pub use config::Config;
pub use dispatch::{ChatDispatcher, IgnoredReason, SendOutcome};
pub use error::{AssistantFailure, Result, ThinktankError};
pub use session::{ChatSession, Message, Role, SessionStore};

#[cfg(test)]
pub mod test_utils;
