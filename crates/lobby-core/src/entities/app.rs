//! App descriptor and per-lobby app session
//!
//! An "app" is one pluggable mini-game. The descriptor is its static
//! registration record; the session is the mutable per-(lobby, app)
//! state document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::LobbyId;

/// Membership bounds an app imposes on its lobby
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersLimit {
    pub min: usize,
    pub max: usize,
}

impl UsersLimit {
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Exactly-n variant used by fixed-seat games
    #[must_use]
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }
}

/// Static registration record of a pluggable app
///
/// Immutable after registration. `default_store` is the template the
/// session store is seeded from when no persisted session exists yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    pub name: String,
    pub users_limit: UsersLimit,
    pub hot_join: bool,
    pub hot_leave: bool,
    pub exclusive: bool,
    pub default_store: Value,
}

/// Mutable per-(lobby, app) state document
///
/// `store` is opaque to the framework; its shape is owned by the app.
/// Persistence is last-write-wins through `AppSessionStore::upsert`, and
/// only ever happens on an explicit commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSession {
    pub lobby_id: LobbyId,
    pub name: String,
    pub store: Value,
    pub exclusive: bool,
}

impl AppSession {
    /// Synthesize a fresh, not-yet-persisted session from a descriptor
    #[must_use]
    pub fn fresh(lobby_id: LobbyId, descriptor: &AppDescriptor) -> Self {
        Self {
            lobby_id,
            name: descriptor.name.clone(),
            store: descriptor.default_store.clone(),
            exclusive: descriptor.exclusive,
        }
    }
}
