//! Store traits (ports) - define the interface for data access
//!
//! The core defines what it needs from the storage collaborator; an
//! infrastructure crate provides the implementation. Persistence semantics
//! are last-write-wins per document; there is no transactional isolation at
//! this boundary.

use async_trait::async_trait;

use crate::entities::{AppSession, Lobby};
use crate::error::DomainError;
use crate::value_objects::LobbyId;

/// Result type for store operations
pub type StoreResult<T> = Result<T, DomainError>;

/// Read access to lobbies and their membership
#[async_trait]
pub trait LobbyStore: Send + Sync {
    /// Fetch a lobby with its full member list
    ///
    /// Fails with [`DomainError::LobbyNotFound`] when the lobby is gone.
    async fn get_with_members(&self, id: LobbyId) -> StoreResult<Lobby>;

    /// Resolve a lobby by its opaque join/observe token
    ///
    /// Fails with [`DomainError::UnknownToken`] when nothing matches.
    async fn find_by_token(&self, token: &str) -> StoreResult<Lobby>;
}

/// Access to per-(lobby, app) session documents
#[async_trait]
pub trait AppSessionStore: Send + Sync {
    /// Fetch the session for `(lobby_id, name)`, `None` if never committed
    async fn get(&self, lobby_id: LobbyId, name: &str) -> StoreResult<Option<AppSession>>;

    /// Create-or-overwrite the session keyed by `(lobby_id, name)`
    async fn upsert(&self, session: &AppSession) -> StoreResult<()>;

    /// Delete the session; deleting an absent session is not an error
    async fn delete(&self, lobby_id: LobbyId, name: &str) -> StoreResult<()>;
}
