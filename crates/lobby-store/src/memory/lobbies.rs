//! In-memory lobby store
//!
//! Implements `LobbyStore` plus the seeding CRUD (create/join/leave) that an
//! external membership service would provide in a full deployment.

use async_trait::async_trait;
use dashmap::DashMap;
use rand::RngCore;
use std::sync::Arc;

use lobby_core::{DomainError, Lobby, LobbyId, LobbyMember, LobbyStore, StoreResult, UserId};

/// In-memory lobby store
#[derive(Debug, Default)]
pub struct MemoryLobbyStore {
    lobbies: DashMap<LobbyId, Lobby>,
}

impl MemoryLobbyStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lobbies: DashMap::new(),
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Create a lobby with the given leader; returns the stored lobby
    pub fn create_lobby(&self, name: impl Into<String>, leader: LobbyMember) -> Lobby {
        let lobby = Lobby::new(LobbyId::generate(), generate_token(), name, leader);
        self.lobbies.insert(lobby.id, lobby.clone());
        tracing::debug!(lobby_id = %lobby.id, "Lobby created");
        lobby
    }

    /// Append a member in join order
    pub fn add_member(&self, lobby_id: LobbyId, member: LobbyMember) -> StoreResult<()> {
        let mut lobby = self
            .lobbies
            .get_mut(&lobby_id)
            .ok_or(DomainError::LobbyNotFound(lobby_id))?;
        if !lobby.is_member(member.id) {
            lobby.members.push(member);
        }
        Ok(())
    }

    /// Remove a member, keeping the remaining join order intact
    pub fn remove_member(&self, lobby_id: LobbyId, user_id: UserId) -> StoreResult<()> {
        let mut lobby = self
            .lobbies
            .get_mut(&lobby_id)
            .ok_or(DomainError::LobbyNotFound(lobby_id))?;
        lobby.members.retain(|m| m.id != user_id);
        Ok(())
    }

    /// Number of stored lobbies
    #[must_use]
    pub fn lobby_count(&self) -> usize {
        self.lobbies.len()
    }
}

/// Opaque hex lobby token
fn generate_token() -> String {
    let mut bytes = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[async_trait]
impl LobbyStore for MemoryLobbyStore {
    async fn get_with_members(&self, id: LobbyId) -> StoreResult<Lobby> {
        self.lobbies
            .get(&id)
            .map(|l| l.clone())
            .ok_or(DomainError::LobbyNotFound(id))
    }

    async fn find_by_token(&self, token: &str) -> StoreResult<Lobby> {
        self.lobbies
            .iter()
            .find(|l| l.token == token)
            .map(|l| l.clone())
            .ok_or(DomainError::UnknownToken)
    }
}
