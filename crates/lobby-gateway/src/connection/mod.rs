//! Connection registry
//!
//! Tracks every live client connection, carries the per-connection scratch
//! store, and runs the process-wide heartbeat sweep.

mod connection;
mod registry;

pub use connection::{ConnStore, Connection, Outbound};
pub use registry::ConnectionRegistry;
