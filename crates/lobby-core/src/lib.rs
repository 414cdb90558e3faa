//! # lobby-core
//!
//! Domain layer for the lobby gateway: lobby and app-session entities, the
//! membership preverification gate, and the storage collaborator traits.
//! This crate has zero dependencies on infrastructure (sockets, web
//! framework, storage backends).

pub mod entities;
pub mod error;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{AppDescriptor, AppSession, Lobby, LobbyMember, UsersLimit};
pub use error::{DomainError, PolicyViolation};
pub use policy::{can_join, can_leave, can_start};
pub use traits::{AppSessionStore, LobbyStore, StoreResult};
pub use value_objects::{LobbyId, UserId};
