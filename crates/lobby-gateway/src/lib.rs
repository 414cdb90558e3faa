//! # lobby-gateway
//!
//! WebSocket gateway for real-time lobby sessions and pluggable
//! turn-based mini-games.

pub mod apps;
pub mod connection;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use error::{GatewayError, GatewayResult};
pub use server::{run, serve, GatewayState};
