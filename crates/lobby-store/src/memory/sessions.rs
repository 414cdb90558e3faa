//! In-memory app-session store
//!
//! Session documents are keyed by `(lobby_id, app name)` and overwritten
//! whole on upsert - last write wins, no versioning.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use lobby_core::{AppSession, AppSessionStore, LobbyId, StoreResult};

/// In-memory app-session store
#[derive(Debug, Default)]
pub struct MemoryAppSessionStore {
    sessions: DashMap<(LobbyId, String), AppSession>,
}

impl MemoryAppSessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of stored sessions
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl AppSessionStore for MemoryAppSessionStore {
    async fn get(&self, lobby_id: LobbyId, name: &str) -> StoreResult<Option<AppSession>> {
        Ok(self
            .sessions
            .get(&(lobby_id, name.to_string()))
            .map(|s| s.clone()))
    }

    async fn upsert(&self, session: &AppSession) -> StoreResult<()> {
        self.sessions.insert(
            (session.lobby_id, session.name.clone()),
            session.clone(),
        );
        Ok(())
    }

    async fn delete(&self, lobby_id: LobbyId, name: &str) -> StoreResult<()> {
        self.sessions.remove(&(lobby_id, name.to_string()));
        Ok(())
    }
}
