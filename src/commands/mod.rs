/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`: Interactive chat with the assistant
- `sessions`: List, show, rename, and delete stored sessions
- `account`: Theme, profile, sign-out, and service health

Handlers open the persistent store from configuration and use the
library components (session store, dispatcher, assistant client).
*/

use crate::config::Config;
use crate::error::Result;
use crate::session::SessionStore;
use crate::storage::SledStore;

pub mod account;
pub mod chat;
pub mod display;
pub mod sessions;
pub mod special_commands;

/// Open the configured persistence backend
pub fn open_backend(config: &Config) -> Result<SledStore> {
    let path = config.storage.resolve_path()?;
    SledStore::open(path)
}

/// Open the configured backend and load its session collection
pub fn open_session_store(config: &Config) -> Result<SessionStore<SledStore>> {
    SessionStore::open(open_backend(config)?)
}
