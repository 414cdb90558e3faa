//! Domain entities

mod app;
mod lobby;

pub use app::{AppDescriptor, AppSession, UsersLimit};
pub use lobby::{Lobby, LobbyMember};
