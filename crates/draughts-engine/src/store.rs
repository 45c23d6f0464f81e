//! Session persistence collaborators.
//!
//! The engine never performs I/O itself. A store owns the session records:
//! the request layer loads a session by game code, invokes one engine
//! operation on it, and saves the updated record back. Operations on the
//! same game code must be serialized by the caller; distinct codes are
//! independent.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::types::{GameCode, GameSession};

/// Failures from session stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The game code does not resolve to a session.
    #[error("no session found for game code {code}")]
    SessionNotFound {
        /// The unresolved code.
        code: GameCode,
    },

    /// A session with this code already exists.
    #[error("a session already exists for game code {code}")]
    AlreadyExists {
        /// The conflicting code.
        code: GameCode,
    },

    /// The backing storage could not be read or written.
    #[error("storage I/O failed")]
    Io(#[from] std::io::Error),

    /// The backing storage held data that does not parse as session records.
    #[error("corrupt session data")]
    Corrupt(#[source] serde_json::Error),
}

/// Narrow persistence contract the request layer implements or reuses.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// File a new session under its code. Fails with [`StoreError::AlreadyExists`]
    /// when the code is taken.
    async fn create(&self, session: &GameSession) -> Result<(), StoreError>;

    /// Fetch the session filed under `code`.
    async fn load(&self, code: &GameCode) -> Result<GameSession, StoreError>;

    /// Overwrite a previously created session. Fails with
    /// [`StoreError::SessionNotFound`] when the code was never created.
    async fn save(&self, session: &GameSession) -> Result<(), StoreError>;
}

/// In-memory store for tests and single-process servers.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<GameCode, GameSession>>,
}

impl MemorySessionStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: &GameSession) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock();
        if sessions.contains_key(&session.code) {
            return Err(StoreError::AlreadyExists {
                code: session.code.clone(),
            });
        }
        sessions.insert(session.code.clone(), session.clone());
        debug!(code = %session.code, "session created");
        Ok(())
    }

    async fn load(&self, code: &GameCode) -> Result<GameSession, StoreError> {
        self.sessions
            .lock()
            .get(code)
            .cloned()
            .ok_or_else(|| StoreError::SessionNotFound { code: code.clone() })
    }

    async fn save(&self, session: &GameSession) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock();
        match sessions.get_mut(&session.code) {
            Some(stored) => {
                *stored = session.clone();
                Ok(())
            }
            None => Err(StoreError::SessionNotFound {
                code: session.code.clone(),
            }),
        }
    }
}

/// Whole-file JSON document store: one object keyed by game code, read on
/// every load and rewritten on every save.
///
/// This mirrors the single-file collaborator the engine was designed against.
/// It offers no cross-process locking; see the module docs for the
/// serialization requirement.
pub struct JsonSessionStore {
    path: PathBuf,
}

impl JsonSessionStore {
    /// Open a store at `path`, creating the file with an empty document when
    /// it does not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            fs::write(&path, "{}")?;
        }
        Ok(Self { path })
    }

    fn read_all(&self) -> Result<HashMap<GameCode, GameSession>, StoreError> {
        let text = fs::read_to_string(&self.path)?;
        serde_json::from_str(&text).map_err(StoreError::Corrupt)
    }

    fn write_all(&self, sessions: &HashMap<GameCode, GameSession>) -> Result<(), StoreError> {
        let text = serde_json::to_string(sessions).map_err(StoreError::Corrupt)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for JsonSessionStore {
    async fn create(&self, session: &GameSession) -> Result<(), StoreError> {
        let mut sessions = self.read_all()?;
        if sessions.contains_key(&session.code) {
            return Err(StoreError::AlreadyExists {
                code: session.code.clone(),
            });
        }
        sessions.insert(session.code.clone(), session.clone());
        self.write_all(&sessions)?;
        debug!(code = %session.code, path = %self.path.display(), "session created");
        Ok(())
    }

    async fn load(&self, code: &GameCode) -> Result<GameSession, StoreError> {
        self.read_all()?
            .remove(code)
            .ok_or_else(|| StoreError::SessionNotFound { code: code.clone() })
    }

    async fn save(&self, session: &GameSession) -> Result<(), StoreError> {
        let mut sessions = self.read_all()?;
        if !sessions.contains_key(&session.code) {
            return Err(StoreError::SessionNotFound {
                code: session.code.clone(),
            });
        }
        sessions.insert(session.code.clone(), session.clone());
        self.write_all(&sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(host: &str) -> GameSession {
        GameSession::new(GameCode::generate(), host)
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemorySessionStore::new();
        let created = session("alice");

        store.create(&created).await.unwrap();
        let loaded = store.load(&created.code).await.unwrap();
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn memory_store_rejects_duplicate_create() {
        let store = MemorySessionStore::new();
        let created = session("alice");

        store.create(&created).await.unwrap();
        let err = store.create(&created).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn memory_store_load_unknown_code() {
        let store = MemorySessionStore::new();
        let err = store.load(&GameCode::new("missing")).await.unwrap_err();
        assert!(matches!(err, StoreError::SessionNotFound { .. }));
    }

    #[tokio::test]
    async fn memory_store_save_requires_create() {
        let store = MemorySessionStore::new();
        let never_created = session("alice");

        let err = store.save(&never_created).await.unwrap_err();
        assert!(matches!(err, StoreError::SessionNotFound { .. }));

        store.create(&never_created).await.unwrap();
        let mut updated = never_created.clone();
        updated.guest = Some("bob".to_string());
        store.save(&updated).await.unwrap();

        let loaded = store.load(&updated.code).await.unwrap();
        assert_eq!(loaded.guest.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn json_store_persists_between_handles() {
        let path = std::env::temp_dir().join(format!("draughts-{}.json", GameCode::generate()));
        let created = session("alice");

        {
            let store = JsonSessionStore::new(&path).unwrap();
            store.create(&created).await.unwrap();
        }

        // A second handle over the same file sees the record.
        let store = JsonSessionStore::new(&path).unwrap();
        let loaded = store.load(&created.code).await.unwrap();
        assert_eq!(loaded, created);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn json_store_create_save_load_cycle() {
        let path = std::env::temp_dir().join(format!("draughts-{}.json", GameCode::generate()));
        let store = JsonSessionStore::new(&path).unwrap();

        let created = session("alice");
        store.create(&created).await.unwrap();
        assert!(matches!(
            store.create(&created).await.unwrap_err(),
            StoreError::AlreadyExists { .. }
        ));

        let mut updated = created.clone();
        updated.join("bob").unwrap();
        store.save(&updated).await.unwrap();

        let loaded = store.load(&updated.code).await.unwrap();
        assert_eq!(loaded.guest.as_deref(), Some("bob"));

        assert!(matches!(
            store.load(&GameCode::new("missing")).await.unwrap_err(),
            StoreError::SessionNotFound { .. }
        ));

        std::fs::remove_file(&path).unwrap();
    }
}
