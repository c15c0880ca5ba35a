//! Error types for ThinkTank
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for ThinkTank operations
///
/// This enum covers configuration loading, the persistence backend,
/// session lookups, and the assistant service client.
#[derive(Error, Debug)]
pub enum ThinktankError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persistence backend errors (open, read, write, flush)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A session id that is not part of the current collection
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// A session id prefix that matches more than one session
    #[error("Session id prefix '{prefix}' is ambiguous ({matches} sessions match)")]
    AmbiguousSessionId {
        /// The prefix that was looked up
        prefix: String,
        /// Number of sessions whose id starts with the prefix
        matches: usize,
    },

    /// Assistant service failures
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantFailure),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Ways a chat request to the assistant service can fail
///
/// The display text of each variant is the detail shown to the user in the
/// conversation, after the common "Something went wrong." prefix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistantFailure {
    /// The service could not be reached at all
    #[error("Cannot connect to the server. Please make sure the assistant backend is running at {endpoint}.")]
    Connect {
        /// Endpoint the request was sent to
        endpoint: String,
    },

    /// The service redirected the request to another origin
    #[error("Cross-origin request blocked. Please check the server configuration.")]
    CrossOrigin,

    /// The service answered with a non-2xx status
    #[error("HTTP error! status: {status}, message: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body text
        body: String,
    },

    /// The service answered 2xx with an `error` field
    #[error("{0}")]
    Application(String),

    /// Any other transport or decoding failure
    #[error("{0}")]
    Transport(String),
}

impl AssistantFailure {
    /// Human-readable diagnostic recorded as the assistant's reply
    ///
    /// # Examples
    ///
    /// ```
    /// use thinktank::error::AssistantFailure;
    ///
    /// let failure = AssistantFailure::Application("backend down".to_string());
    /// assert_eq!(failure.diagnostic(), "Something went wrong. backend down");
    /// ```
    pub fn diagnostic(&self) -> String {
        format!("Something went wrong. {}", self)
    }
}

/// Result type alias for ThinkTank operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
