//! Store traits (ports) - the storage collaborator interface the core needs

mod stores;

pub use stores::{AppSessionStore, LobbyStore, StoreResult};
