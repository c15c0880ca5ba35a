//! Assistant client trait and wire types
//!
//! The assistant service is opaque: it takes one user message and answers
//! with text or an error string. Anything able to do that can stand in for
//! the HTTP client, which keeps the dispatch flow testable.

use crate::error::{AssistantFailure, Result, ThinktankError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request body sent to the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message text
    pub message: String,
}

/// Response body returned by the chat endpoint
///
/// The service sets exactly one of the two fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant text (markdown) on success
    #[serde(default)]
    pub response: Option<String>,
    /// Application-level failure description
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatReply {
    /// Interpret the reply, treating an `error` field as failure
    ///
    /// # Examples
    ///
    /// ```
    /// use thinktank::assistant::ChatReply;
    ///
    /// let reply = ChatReply { response: Some("Hi".into()), error: None };
    /// assert_eq!(reply.into_text().unwrap(), "Hi");
    /// ```
    pub fn into_text(self) -> std::result::Result<String, AssistantFailure> {
        if let Some(error) = self.error {
            return Err(AssistantFailure::Application(error));
        }
        self.response.ok_or_else(|| {
            AssistantFailure::Transport(
                "Assistant reply did not contain a response".to_string(),
            )
        })
    }
}

/// Body of the service's health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Reported status, "healthy" when the service is up
    pub status: String,
    /// Free-form status message
    #[serde(default)]
    pub message: String,
    /// Port the service reports listening on
    #[serde(default)]
    pub port: Option<u16>,
}

impl HealthStatus {
    /// Whether the service reported itself healthy
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// A remote service that turns a user message into an answer
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Send one message and wait for the answer
    ///
    /// # Errors
    ///
    /// Returns the failure classification used to build the diagnostic
    /// recorded in the conversation
    async fn ask(&self, message: &str) -> std::result::Result<String, AssistantFailure>;

    /// Where chat requests are sent, for display and diagnostics
    fn endpoint(&self) -> String;

    /// Probe the service's health endpoint
    ///
    /// # Default Implementation
    ///
    /// Returns an error saying health checks are not supported.
    async fn health(&self) -> Result<HealthStatus> {
        Err(ThinktankError::Assistant(AssistantFailure::Transport(
            "Health checks are not supported by this client".to_string(),
        ))
        .into())
    }
}
