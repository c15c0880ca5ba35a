//! HTTP client for the assistant service
//!
//! Sends `POST {"message": ...}` to the configured chat endpoint and reads
//! back `{"response": ...}` or `{"error": ...}`. One request per message,
//! no retries. A timeout is only applied when configured.

use crate::assistant::base::{AssistantClient, ChatReply, ChatRequest, HealthStatus};
use crate::config::AssistantConfig;
use crate::error::{AssistantFailure, Result, ThinktankError};

use async_trait::async_trait;
use reqwest::redirect::{Attempt, Policy};
use reqwest::{Client, Url};
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

/// Redirects followed within the service's own origin
const MAX_REDIRECTS: usize = 10;

/// Raised by the redirect policy when the service points elsewhere
#[derive(Error, Debug)]
#[error("redirect to {location} leaves the assistant service origin")]
struct CrossOriginRedirect {
    location: String,
}

/// Assistant service reached over HTTP
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use thinktank::assistant::HttpAssistant;
/// use thinktank::config::AssistantConfig;
/// use thinktank::dispatch::ChatDispatcher;
/// use thinktank::session::SessionStore;
/// use thinktank::storage::MemoryStore;
///
/// # async fn example() -> thinktank::error::Result<()> {
/// let assistant = Arc::new(HttpAssistant::new(AssistantConfig::default())?);
/// let dispatcher = ChatDispatcher::new(assistant, SessionStore::open(MemoryStore::new())?);
/// let outcome = dispatcher.send("How do I reset my VPN password?").await?;
/// if let Some(reply) = outcome.reply() {
///     println!("{}", reply.content);
/// }
/// # Ok(())
/// # }
/// ```
pub struct HttpAssistant {
    client: Client,
    chat_url: String,
    health_url: String,
}

impl HttpAssistant {
    /// Create a client for the configured service
    ///
    /// # Errors
    ///
    /// Returns `ThinktankError::Config` if the endpoint URL is invalid or the
    /// HTTP client cannot be built
    ///
    /// # Examples
    ///
    /// ```
    /// use thinktank::assistant::{AssistantClient, HttpAssistant};
    /// use thinktank::config::AssistantConfig;
    ///
    /// let assistant = HttpAssistant::new(AssistantConfig::default()).unwrap();
    /// assert_eq!(assistant.endpoint(), "http://localhost:5001/api/chat");
    /// ```
    pub fn new(config: AssistantConfig) -> Result<Self> {
        let chat_url = config.chat_url();
        let origin = Url::parse(&chat_url)
            .map_err(|e| {
                ThinktankError::Config(format!("Invalid assistant URL {}: {}", chat_url, e))
            })?
            .origin();

        let mut builder = Client::builder()
            .user_agent(concat!("thinktank/", env!("CARGO_PKG_VERSION")))
            .redirect(Policy::custom(move |attempt: Attempt| {
                let leaves_origin = attempt.url().origin() != origin;
                if leaves_origin {
                    let location = attempt.url().to_string();
                    attempt.error(CrossOriginRedirect { location })
                } else if attempt.previous().len() >= MAX_REDIRECTS {
                    attempt.error("too many redirects")
                } else {
                    attempt.follow()
                }
            }));

        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let client = builder.build().map_err(|e| {
            ThinktankError::Config(format!("Failed to create HTTP client: {}", e))
        })?;

        tracing::info!("Initialized assistant client: endpoint={}", chat_url);

        Ok(Self {
            client,
            chat_url,
            health_url: config.health_url(),
        })
    }

    fn classify(&self, error: reqwest::Error) -> AssistantFailure {
        if leaves_origin(&error) {
            AssistantFailure::CrossOrigin
        } else if error.is_connect() {
            AssistantFailure::Connect {
                endpoint: self.chat_url.clone(),
            }
        } else if error.is_timeout() {
            AssistantFailure::Transport(format!("Request timed out: {}", error))
        } else {
            AssistantFailure::Transport(error.to_string())
        }
    }
}

fn leaves_origin(error: &reqwest::Error) -> bool {
    let mut source = error.source();
    while let Some(inner) = source {
        if inner.is::<CrossOriginRedirect>() {
            return true;
        }
        source = inner.source();
    }
    false
}

#[async_trait]
impl AssistantClient for HttpAssistant {
    async fn ask(&self, message: &str) -> std::result::Result<String, AssistantFailure> {
        let request = ChatRequest {
            message: message.to_string(),
        };

        tracing::debug!(
            "Sending chat request to {} ({} chars)",
            self.chat_url,
            request.message.len()
        );

        let response = self
            .client
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Assistant request failed: {}", e);
                self.classify(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Assistant returned error {}: {}", status, body);
            return Err(AssistantFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatReply = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse assistant response: {}", e);
            AssistantFailure::Transport(format!("Failed to parse assistant response: {}", e))
        })?;

        let text = reply.into_text();
        match &text {
            Ok(answer) => tracing::debug!("Assistant answered ({} chars)", answer.len()),
            Err(failure) => tracing::warn!("Assistant reported an error: {}", failure),
        }
        text
    }

    fn endpoint(&self) -> String {
        self.chat_url.clone()
    }

    async fn health(&self) -> Result<HealthStatus> {
        tracing::debug!("Checking assistant health at {}", self.health_url);

        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| ThinktankError::Assistant(self.classify(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ThinktankError::Assistant(AssistantFailure::Status {
                status: status.as_u16(),
                body,
            })
            .into());
        }

        let health: HealthStatus = response.json().await?;
        Ok(health)
    }
}
