//! # lobby-store
//!
//! In-memory implementations of the `lobby-core` store traits. Persistence
//! guarantees stop at last-write-wins per document, which is exactly the
//! contract the gateway core relies on. The lobby half also carries the
//! minimal membership CRUD the external lobby service would normally own,
//! so binaries and tests can seed state.

pub mod memory;

pub use memory::{MemoryAppSessionStore, MemoryLobbyStore};
