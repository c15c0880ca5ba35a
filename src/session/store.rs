use crate::error::{Result, ThinktankError};
use crate::session::title::derive_title;
use crate::session::types::{decode_sessions, encode_sessions, ChatSession, Message};
use crate::storage::{KeyValueStore, CHAT_SESSIONS_KEY};
use chrono::Utc;

/// Restored ids further ahead of the clock than this are not tracked
const MAX_ID_LEAD_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Hands out session ids from a millisecond clock
///
/// Ids are strictly increasing within one store, including across ids
/// restored from storage, so two sessions created in the same millisecond
/// still get distinct ids. Restored ids more than a day ahead of the clock
/// are ignored so a corrupt id cannot pin the generator at `i64::MAX`.
#[derive(Debug, Default)]
struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    fn next(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last.saturating_add(1));
        self.last = id;
        id.to_string()
    }

    fn observe(&mut self, id: &str) {
        let horizon = Utc::now()
            .timestamp_millis()
            .saturating_add(MAX_ID_LEAD_MILLIS);
        match id.parse::<i64>() {
            Ok(value) if value <= horizon => self.last = self.last.max(value),
            Ok(value) => tracing::warn!("Ignoring far-future session id {}", value),
            Err(_) => {}
        }
    }
}

/// Chat session collection kept in sync with a persistence backend
///
/// Sessions are ordered newest-created first. The active session is held
/// by id, so renames and appends are visible through [`SessionStore::active`]
/// without any copy to refresh.
///
/// Every successful mutation writes the whole collection back under
/// `chatSessions`. If that write fails the error is returned but the
/// in-memory change is kept.
///
/// # Examples
///
/// ```
/// use thinktank::session::{Message, SessionStore};
/// use thinktank::storage::MemoryStore;
///
/// # fn main() -> thinktank::error::Result<()> {
/// let mut store = SessionStore::open(MemoryStore::new())?;
/// assert_eq!(store.len(), 1);
///
/// let id = store.active_id().unwrap().to_string();
/// let session = store.append_message(&id, Message::user("Hi"))?;
/// assert_eq!(session.title, "Hi");
/// # Ok(())
/// # }
/// ```
pub struct SessionStore<B> {
    backend: B,
    sessions: Vec<ChatSession>,
    active: Option<String>,
    ids: IdGenerator,
}

impl<B: KeyValueStore> SessionStore<B> {
    /// Create an uninitialized store with no sessions
    ///
    /// Call [`SessionStore::load`] before use, or use [`SessionStore::open`].
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            sessions: Vec::new(),
            active: None,
            ids: IdGenerator::default(),
        }
    }

    /// Create a store and immediately load it from the backend
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be read or written
    pub fn open(backend: B) -> Result<Self> {
        let mut store = Self::new(backend);
        store.load()?;
        Ok(store)
    }

    /// Restore the session collection from the backend
    ///
    /// Missing, malformed, or empty data is replaced by a single fresh
    /// session. The first session becomes active.
    ///
    /// # Errors
    ///
    /// Returns error if the backend itself fails; bad data is not an error
    pub fn load(&mut self) -> Result<()> {
        let restored = match self.backend.get(CHAT_SESSIONS_KEY)? {
            Some(raw) => match decode_sessions(&raw) {
                Ok(sessions) => sessions,
                Err(e) => {
                    tracing::warn!("Discarding malformed stored sessions: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        for session in &restored {
            self.ids.observe(&session.id);
        }

        if restored.is_empty() {
            tracing::debug!("No stored sessions, starting a new chat");
            let fresh = ChatSession::new(self.ids.next());
            self.active = Some(fresh.id.clone());
            self.sessions = vec![fresh];
            self.persist()?;
        } else {
            tracing::debug!("Restored {} sessions", restored.len());
            self.active = restored.first().map(|s| s.id.clone());
            self.sessions = restored;
        }

        Ok(())
    }

    /// Create a new empty session, place it first, and make it active
    ///
    /// # Errors
    ///
    /// Returns error if the collection cannot be persisted
    pub fn create_session(&mut self) -> Result<&ChatSession> {
        let session = ChatSession::new(self.ids.next());
        tracing::debug!("Created session {}", session.id);
        self.active = Some(session.id.clone());
        self.sessions.insert(0, session);
        self.persist()?;
        Ok(&self.sessions[0])
    }

    /// Make the session with `id` active
    ///
    /// # Errors
    ///
    /// Returns `ThinktankError::SessionNotFound` if no session has that id
    pub fn select_session(&mut self, id: &str) -> Result<()> {
        if self.position(id).is_none() {
            return Err(ThinktankError::SessionNotFound(id.to_string()).into());
        }
        self.active = Some(id.to_string());
        Ok(())
    }

    /// Remove the session with `id`
    ///
    /// When the active session is removed, the new first session becomes
    /// active, or a fresh session is created if none remain.
    ///
    /// # Errors
    ///
    /// Returns `ThinktankError::SessionNotFound` if no session has that id,
    /// or a storage error if the collection cannot be persisted
    pub fn delete_session(&mut self, id: &str) -> Result<()> {
        let index = self
            .position(id)
            .ok_or_else(|| ThinktankError::SessionNotFound(id.to_string()))?;
        self.sessions.remove(index);
        tracing::debug!("Deleted session {}", id);

        if self.sessions.is_empty() {
            let fresh = ChatSession::new(self.ids.next());
            self.active = Some(fresh.id.clone());
            self.sessions.push(fresh);
        } else if self.active.as_deref() == Some(id) {
            self.active = self.sessions.first().map(|s| s.id.clone());
        }

        self.persist()
    }

    /// Set the title of the session with `id`
    ///
    /// # Errors
    ///
    /// Returns `ThinktankError::SessionNotFound` if no session has that id,
    /// or a storage error if the collection cannot be persisted
    pub fn rename_session(&mut self, id: &str, title: impl Into<String>) -> Result<()> {
        let index = self
            .position(id)
            .ok_or_else(|| ThinktankError::SessionNotFound(id.to_string()))?;
        self.sessions[index].title = title.into();
        self.persist()
    }

    /// Append `message` to the session with `id` and return the session
    ///
    /// The first message of a session also sets its title.
    ///
    /// # Errors
    ///
    /// Returns `ThinktankError::SessionNotFound` if no session has that id,
    /// or a storage error if the collection cannot be persisted
    pub fn append_message(&mut self, id: &str, message: Message) -> Result<&ChatSession> {
        let index = self
            .position(id)
            .ok_or_else(|| ThinktankError::SessionNotFound(id.to_string()))?;

        let session = &mut self.sessions[index];
        if session.messages.is_empty() {
            session.title = derive_title(&message.content);
        }
        session.messages.push(message);
        self.persist()?;

        Ok(&self.sessions[index])
    }

    /// Resolve a full id or a unique id prefix to a full id
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` when nothing matches and
    /// `AmbiguousSessionId` when more than one session matches
    pub fn resolve_id(&self, prefix: &str) -> Result<String> {
        if self.position(prefix).is_some() {
            return Ok(prefix.to_string());
        }

        let matches: Vec<&ChatSession> = self
            .sessions
            .iter()
            .filter(|s| !prefix.is_empty() && s.id.starts_with(prefix))
            .collect();

        match matches.as_slice() {
            [] => Err(ThinktankError::SessionNotFound(prefix.to_string()).into()),
            [only] => Ok(only.id.clone()),
            many => Err(ThinktankError::AmbiguousSessionId {
                prefix: prefix.to_string(),
                matches: many.len(),
            }
            .into()),
        }
    }

    /// Drop every session from memory without touching the backend
    pub fn clear(&mut self) {
        self.sessions.clear();
        self.active = None;
    }

    /// Sessions in display order (newest first)
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// Session with `id`, if present
    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Currently active session
    pub fn active(&self) -> Option<&ChatSession> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    /// Id of the currently active session
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Number of sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the collection is empty (only before load or after clear)
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// The persistence backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == id)
    }

    fn persist(&self) -> Result<()> {
        let raw = encode_sessions(&self.sessions)
            .map_err(|e| ThinktankError::Storage(format!("Failed to serialize sessions: {}", e)))?;
        self.backend.set(CHAT_SESSIONS_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::Role;
    use crate::storage::MemoryStore;
    use crate::test_utils::{assert_error_contains, seeded_backend, FlakyStore};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn stored_session(id: &str, title: &str) -> ChatSession {
        let mut session = ChatSession::new(id);
        session.title = title.to_string();
        session.created_at = Utc.with_ymd_and_hms(2024, 6, 10, 6, 13, 20).unwrap();
        session
    }

    fn open_store() -> (SessionStore<Arc<MemoryStore>>, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        let store = SessionStore::open(Arc::clone(&backend)).expect("open failed");
        (store, backend)
    }

    #[test]
    fn test_load_empty_backend_yields_single_new_chat() {
        let (store, backend) = open_store();
        assert_eq!(store.len(), 1);
        let active = store.active().expect("active session");
        assert_eq!(active.title, "New Chat");
        assert!(active.messages.is_empty());
        assert_eq!(store.sessions()[0].id, active.id);
        assert!(backend.get(CHAT_SESSIONS_KEY).unwrap().is_some());
    }

    #[test]
    fn test_load_malformed_data_recovers() {
        let backend = MemoryStore::with_entries([(CHAT_SESSIONS_KEY, "{not json")]);
        let store = SessionStore::open(backend).expect("open failed");
        assert_eq!(store.len(), 1);
        assert_eq!(store.active().unwrap().title, "New Chat");
    }

    #[test]
    fn test_load_empty_array_recovers() {
        let backend = MemoryStore::with_entries([(CHAT_SESSIONS_KEY, "[]")]);
        let store = SessionStore::open(backend).expect("open failed");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_selects_first_stored_session() {
        let backend = seeded_backend(&[
            stored_session("200", "Second"),
            stored_session("100", "First"),
        ]);
        let store = SessionStore::open(backend).expect("open failed");
        assert_eq!(store.active_id(), Some("200"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_new_ids_exceed_restored_ids() {
        let future = (Utc::now().timestamp_millis() + 10_000_000).to_string();
        let mut store = SessionStore::open(seeded_backend(&[stored_session(&future, "t")]))
            .expect("open failed");
        let id = store.create_session().unwrap().id.clone();
        assert!(id.parse::<i64>().unwrap() > future.parse::<i64>().unwrap());
    }

    #[test]
    fn test_max_restored_id_does_not_overflow() {
        let max = i64::MAX.to_string();
        let mut store =
            SessionStore::open(seeded_backend(&[stored_session(&max, "t")])).expect("open failed");

        let created = store.create_session().unwrap().id.clone();
        assert_ne!(created, max);
        store.delete_session(&max).unwrap();
        store.delete_session(&created).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_id_generator_saturates_at_max() {
        let mut ids = IdGenerator { last: i64::MAX };
        assert_eq!(ids.next(), i64::MAX.to_string());
    }

    #[test]
    fn test_create_session_prepends_and_activates() {
        let (mut store, _) = open_store();
        let first = store.active_id().unwrap().to_string();

        let created = store.create_session().unwrap().id.clone();
        assert_ne!(created, first);
        assert_eq!(store.sessions()[0].id, created);
        assert_eq!(store.active_id(), Some(created.as_str()));
    }

    #[test]
    fn test_rapid_creates_get_unique_ids() {
        let (mut store, _) = open_store();
        let mut ids: Vec<String> = (0..50)
            .map(|_| store.create_session().unwrap().id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_select_session_switches_active() {
        let (mut store, _) = open_store();
        let older = store.active_id().unwrap().to_string();
        store.create_session().unwrap();

        store.select_session(&older).unwrap();
        assert_eq!(store.active_id(), Some(older.as_str()));
    }

    #[test]
    fn test_select_unknown_session_is_not_found() {
        let (mut store, _) = open_store();
        let result = store.select_session("nope");
        assert!(matches!(
            result.as_ref().unwrap_err().downcast_ref::<ThinktankError>(),
            Some(ThinktankError::SessionNotFound(_))
        ));
        assert_error_contains(result, "Session not found: nope");
    }

    #[test]
    fn test_delete_only_session_creates_fresh_one() {
        let (mut store, _) = open_store();
        let only = store.active_id().unwrap().to_string();

        store.delete_session(&only).unwrap();
        assert_eq!(store.len(), 1);
        let active = store.active().unwrap();
        assert_ne!(active.id, only);
        assert_eq!(active.title, "New Chat");
        assert!(active.messages.is_empty());
    }

    #[test]
    fn test_delete_active_session_activates_first() {
        let (mut store, _) = open_store();
        let oldest = store.active_id().unwrap().to_string();
        let middle = store.create_session().unwrap().id.clone();
        let newest = store.create_session().unwrap().id.clone();

        store.delete_session(&newest).unwrap();
        assert_eq!(store.active_id(), Some(middle.as_str()));
        assert_eq!(store.sessions().last().unwrap().id, oldest);
    }

    #[test]
    fn test_delete_inactive_session_keeps_active() {
        let (mut store, _) = open_store();
        let oldest = store.active_id().unwrap().to_string();
        let newest = store.create_session().unwrap().id.clone();

        store.delete_session(&oldest).unwrap();
        assert_eq!(store.active_id(), Some(newest.as_str()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_collection_never_empty_after_create_delete_sequences() {
        let (mut store, _) = open_store();
        for round in 0..20 {
            if round % 3 == 0 {
                store.create_session().unwrap();
            } else {
                let victim = if round % 2 == 0 {
                    store.active_id().unwrap().to_string()
                } else {
                    store.sessions().last().unwrap().id.clone()
                };
                store.delete_session(&victim).unwrap();
            }
            assert!(!store.is_empty());
            assert!(store.active().is_some());
        }
    }

    #[test]
    fn test_rename_is_visible_through_active() {
        let (mut store, _) = open_store();
        let id = store.active_id().unwrap().to_string();
        store.rename_session(&id, "Renamed").unwrap();
        assert_eq!(store.active().unwrap().title, "Renamed");
    }

    #[test]
    fn test_append_is_append_only() {
        let (mut store, _) = open_store();
        let id = store.active_id().unwrap().to_string();

        let mut snapshot: Vec<Message> = Vec::new();
        for i in 0..5 {
            let message = if i % 2 == 0 {
                Message::user(format!("question {}", i))
            } else {
                Message::assistant(format!("answer {}", i))
            };
            let session = store.append_message(&id, message.clone()).unwrap();
            assert_eq!(session.messages.len(), snapshot.len() + 1);
            assert_eq!(&session.messages[..snapshot.len()], snapshot.as_slice());
            snapshot.push(message);
        }
    }

    #[test]
    fn test_first_message_sets_title_once() {
        let (mut store, _) = open_store();
        let id = store.active_id().unwrap().to_string();

        store
            .append_message(
                &id,
                Message::user("Reset my VPN password for the east cluster please"),
            )
            .unwrap();
        let session = store
            .append_message(&id, Message::assistant("Here is how"))
            .unwrap();
        assert_eq!(session.title, "Reset my VPN password for the…");
        assert_eq!(session.messages[1].role, Role::Assistant);
    }

    #[test]
    fn test_append_to_unknown_session_fails() {
        let (mut store, _) = open_store();
        assert_error_contains(
            store.append_message("missing", Message::user("x")).map(|_| ()),
            "Session not found: missing",
        );
    }

    #[test]
    fn test_mutations_are_persisted() {
        let (mut store, backend) = open_store();
        let id = store.active_id().unwrap().to_string();
        store.append_message(&id, Message::user("Hi")).unwrap();

        let reopened = SessionStore::open(Arc::clone(&backend)).unwrap();
        assert_eq!(reopened.sessions(), store.sessions());
    }

    #[test]
    fn test_resolve_id_by_prefix() {
        let store = SessionStore::open(seeded_backend(&[
            stored_session("1718000000001", "a"),
            stored_session("1718000000002", "b"),
            stored_session("1719000000000", "c"),
        ]))
        .unwrap();

        assert_eq!(store.resolve_id("1719").unwrap(), "1719000000000");
        assert_eq!(store.resolve_id("1718000000002").unwrap(), "1718000000002");

        let err = store.resolve_id("1718").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ThinktankError>(),
            Some(ThinktankError::AmbiguousSessionId { matches: 2, .. })
        ));
        assert_error_contains(store.resolve_id("1718"), "is ambiguous (2 sessions match)");
        assert_error_contains(store.resolve_id("99"), "Session not found");
        assert!(store.resolve_id("").is_err());
    }

    #[test]
    fn test_failed_write_keeps_in_memory_change() {
        let backend = Arc::new(FlakyStore::new());
        let mut store = SessionStore::open(Arc::clone(&backend)).unwrap();
        let id = store.active_id().unwrap().to_string();
        backend.set_failing(true);

        let result = store.append_message(&id, Message::user("Hello there"));
        assert!(matches!(
            result.as_ref().unwrap_err().downcast_ref::<ThinktankError>(),
            Some(ThinktankError::Storage(_))
        ));
        assert_eq!(store.active().unwrap().messages.len(), 1);
        assert_eq!(store.active().unwrap().title, "Hello there");

        let result = store.create_session().map(|s| s.id.clone());
        assert_error_contains(result, "Storage error");
        assert_eq!(store.len(), 2);
        assert_ne!(store.active_id(), Some(id.as_str()));

        backend.set_failing(false);
        store.rename_session(&id, "Recovered").unwrap();
        let reopened = SessionStore::open(Arc::clone(&backend)).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get(&id).unwrap().messages.len(), 1);
    }

    #[test]
    fn test_clear_empties_memory_only() {
        let (mut store, backend) = open_store();
        store.clear();
        assert!(store.is_empty());
        assert!(store.active().is_none());
        assert!(backend.get(CHAT_SESSIONS_KEY).unwrap().is_some());
    }
}
