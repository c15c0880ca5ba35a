//! Test utilities for ThinkTank
//!
//! This module provides common test utilities including temporary directory
//! management, pre-seeded and failing stores, a fixed-answer assistant, and
//! assertion helpers.

use crate::assistant::AssistantClient;
use crate::error::{AssistantFailure, Result, ThinktankError};
use crate::session::{ChatSession, SessionStore};
use crate::storage::{KeyValueStore, MemoryStore, CHAT_SESSIONS_KEY};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// In-memory backend already holding the given sessions
pub fn seeded_backend(sessions: &[ChatSession]) -> MemoryStore {
    let raw = serde_json::to_string(sessions).expect("Failed to encode sessions");
    MemoryStore::with_entries([(CHAT_SESSIONS_KEY.to_string(), raw)])
}

/// Session store over a fresh in-memory backend, already loaded
pub fn memory_session_store() -> SessionStore<MemoryStore> {
    SessionStore::open(MemoryStore::new()).expect("Failed to open memory session store")
}

/// In-memory backend whose writes can be switched to fail
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `set` and `remove` fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ThinktankError::Storage("disk full".to_string()).into());
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.inner.remove(key)
    }
}

/// Assistant that answers every message with the same text
pub struct StaticAssistant {
    answer: String,
}

impl StaticAssistant {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

#[async_trait]
impl AssistantClient for StaticAssistant {
    async fn ask(&self, _message: &str) -> std::result::Result<String, AssistantFailure> {
        Ok(self.answer.clone())
    }

    fn endpoint(&self) -> String {
        "static://assistant".to_string()
    }
}

/// Create a test configuration YAML string
pub fn test_config_yaml() -> String {
    r#"
assistant:
  base_url: http://127.0.0.1:5001
  chat_path: /api/chat
  timeout_seconds: 30

storage:
  path: /tmp/thinktank-test-store
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_error_contains_wrong_message() {
        let result: Result<()> = Err(ThinktankError::Config("different error".to_string()).into());
        assert_error_contains(result, "not present");
    }

    #[test]
    fn test_flaky_store_fails_writes_only_while_failing() {
        let store = FlakyStore::new();
        store.set("theme", "dark").unwrap();

        store.set_failing(true);
        assert_error_contains(store.set("theme", "light"), "disk full");
        assert_error_contains(store.remove("theme"), "disk full");
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));

        store.set_failing(false);
        store.remove("theme").unwrap();
        assert!(store.get("theme").unwrap().is_none());
    }
}
