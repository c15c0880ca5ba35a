//! Chat dispatch: send one user message and record the outcome
//!
//! A send records the user's message in the active session before the
//! network call starts, then records either the assistant's answer or a
//! diagnostic explaining why there is none. At most one send is in flight
//! per dispatcher; further sends are ignored until it completes.

use crate::assistant::AssistantClient;
use crate::error::Result;
use crate::session::{Message, SessionStore};
use crate::storage::KeyValueStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Session store shared between the dispatcher and the front end
pub type SharedSessionStore<B> = Arc<Mutex<SessionStore<B>>>;

/// Why a send did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// The input was empty or whitespace-only
    EmptyInput,
    /// Another send has not completed yet
    InFlight,
    /// The store has no active session (not loaded, or signed out)
    NoActiveSession,
}

/// Result of a send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was recorded and no request was made
    Ignored(IgnoredReason),
    /// The assistant answered; this is the recorded reply
    Answered(Message),
    /// The call failed; this is the recorded diagnostic
    Failed(Message),
}

impl SendOutcome {
    /// The assistant-authored message recorded by this send, if any
    pub fn reply(&self) -> Option<&Message> {
        match self {
            SendOutcome::Answered(message) | SendOutcome::Failed(message) => Some(message),
            SendOutcome::Ignored(_) => None,
        }
    }
}

/// Releases the in-flight flag when dropped
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Single-flight sender of user messages
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
/// let store = SessionStore::open(MemoryStore::new())?;
/// let assistant = Arc::new(HttpAssistant::new(AssistantConfig::default())?);
/// let dispatcher = ChatDispatcher::new(assistant, store);
///
/// let outcome = dispatcher.send("How do I reset my VPN password?").await?;
/// if let Some(reply) = outcome.reply() {
///     println!("{}", reply.content);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ChatDispatcher<B> {
    assistant: Arc<dyn AssistantClient>,
    store: SharedSessionStore<B>,
    in_flight: AtomicBool,
}

impl<B: KeyValueStore> ChatDispatcher<B> {
    /// Create a dispatcher that owns a new shared handle to `store`
    pub fn new(assistant: Arc<dyn AssistantClient>, store: SessionStore<B>) -> Self {
        Self::with_shared(assistant, Arc::new(Mutex::new(store)))
    }

    /// Create a dispatcher over an already shared store
    pub fn with_shared(assistant: Arc<dyn AssistantClient>, store: SharedSessionStore<B>) -> Self {
        Self {
            assistant,
            store,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Handle to the session store
    pub fn store(&self) -> SharedSessionStore<B> {
        Arc::clone(&self.store)
    }

    /// Whether a send is currently waiting on the assistant
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Send `text` as the next user message of the active session
    ///
    /// The user message is recorded before the request is issued. The
    /// reply, or a diagnostic when the call fails, is recorded in the same
    /// session even if another session was selected in the meantime.
    ///
    /// # Errors
    ///
    /// Returns error only if the session store cannot be written; assistant
    /// failures are recorded as messages and reported as
    /// `SendOutcome::Failed`
    pub async fn send(&self, text: &str) -> Result<SendOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(SendOutcome::Ignored(IgnoredReason::EmptyInput));
        }

        let Some(_guard) = InFlightGuard::claim(&self.in_flight) else {
            tracing::debug!("Ignoring send while another request is in flight");
            return Ok(SendOutcome::Ignored(IgnoredReason::InFlight));
        };

        let session_id = {
            let mut store = self.store.lock().await;
            let Some(id) = store.active_id().map(str::to_string) else {
                tracing::warn!("No active session to send to");
                return Ok(SendOutcome::Ignored(IgnoredReason::NoActiveSession));
            };
            store.append_message(&id, Message::user(text))?;
            id
        };

        tracing::debug!("Dispatching message for session {}", session_id);

        let outcome = match self.assistant.ask(text).await {
            Ok(answer) => SendOutcome::Answered(Message::assistant(answer)),
            Err(failure) => {
                tracing::debug!("Recording failure for session {}: {}", session_id, failure);
                SendOutcome::Failed(Message::assistant(failure.diagnostic()))
            }
        };

        let mut store = self.store.lock().await;
        if store.get(&session_id).is_some() {
            if let Some(reply) = outcome.reply() {
                store.append_message(&session_id, reply.clone())?;
            }
        } else {
            tracing::warn!(
                "Session {} was deleted before its reply arrived; dropping reply",
                session_id
            );
        }

        Ok(outcome)
    }
}
