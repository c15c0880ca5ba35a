use crate::session::title::DEFAULT_TITLE;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the person using the client
    User,
    /// Returned by the assistant service, or a diagnostic recorded in its place
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry in a conversation
///
/// Messages are never edited after creation; sessions only ever append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message
    pub role: Role,
    /// Message text (markdown for assistant replies)
    pub content: String,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a new user message stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use thinktank::session::{Message, Role};
    ///
    /// let msg = Message::user("Hello, assistant!");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a new assistant message stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use thinktank::session::{Message, Role};
    ///
    /// let msg = Message::assistant("Hello, user!");
    /// assert_eq!(msg.role, Role::Assistant);
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A conversation thread with its own title and message history
///
/// Serialized with camelCase keys so the stored layout matches the one the
/// browser client writes (`id`, `title`, `createdAt`, `messages`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Unique, never reused identifier
    pub id: String,
    /// Display title; "New Chat" until the first message arrives
    pub title: String,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Messages in display order
    pub messages: Vec<Message>,
}

impl ChatSession {
    /// Creates an empty session titled "New Chat"
    ///
    /// # Examples
    ///
    /// ```
    /// use thinktank::session::ChatSession;
    ///
    /// let session = ChatSession::new("1700000000000");
    /// assert_eq!(session.title, "New Chat");
    /// assert!(session.messages.is_empty());
    /// ```
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_TITLE.to_string(),
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Number of messages in the session
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether no message has been appended yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Serialize a session collection to its stored JSON form
pub fn encode_sessions(sessions: &[ChatSession]) -> serde_json::Result<String> {
    serde_json::to_string(sessions)
}

/// Parse a stored session collection
///
/// Timestamps are read back from their RFC 3339 wire form.
pub fn decode_sessions(raw: &str) -> serde_json::Result<Vec<ChatSession>> {
    serde_json::from_str(raw)
}
