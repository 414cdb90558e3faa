//! Lobby entity - a named group of users who play together
//!
//! Lobbies are owned by an external membership service; the core reads them
//! through `LobbyStore` and never mutates them directly.

use serde::{Deserialize, Serialize};

use crate::value_objects::{LobbyId, UserId};

/// A single lobby member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyMember {
    pub id: UserId,
    pub name: String,
}

impl LobbyMember {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Lobby entity
///
/// `members` is kept in join order; game apps rely on that ordering when
/// assigning seats. `token` is the opaque join/observe handle handed out by
/// the membership service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lobby {
    pub id: LobbyId,
    pub token: String,
    pub name: String,
    pub leader_id: UserId,
    pub members: Vec<LobbyMember>,
}

impl Lobby {
    /// Create a new lobby with the leader as its first member
    pub fn new(
        id: LobbyId,
        token: impl Into<String>,
        name: impl Into<String>,
        leader: LobbyMember,
    ) -> Self {
        Self {
            id,
            token: token.into(),
            name: name.into(),
            leader_id: leader.id,
            members: vec![leader],
        }
    }

    /// Check if a user is the lobby leader
    #[inline]
    pub fn is_leader(&self, user_id: UserId) -> bool {
        self.leader_id == user_id
    }

    /// Check if a user is a lobby member
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.members.iter().any(|m| m.id == user_id)
    }

    /// Look up a member by id
    pub fn member(&self, user_id: UserId) -> Option<&LobbyMember> {
        self.members.iter().find(|m| m.id == user_id)
    }

    /// Current member count
    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
