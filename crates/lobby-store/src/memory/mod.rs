//! DashMap-backed stores

mod lobbies;
mod sessions;

pub use lobbies::MemoryLobbyStore;
pub use sessions::MemoryAppSessionStore;
