//! Chat sessions and their persistence
//!
//! - `types`: `Message`, `ChatSession`, and the stored JSON form
//! - `title`: title derivation from a session's first message
//! - `store`: the session collection, active session, and write-back

pub mod store;
pub mod title;
pub mod types;

pub use store::SessionStore;
pub use title::{derive_title, DEFAULT_TITLE, TITLE_WORD_LIMIT};
pub use types::{decode_sessions, encode_sessions, ChatSession, Message, Role};
