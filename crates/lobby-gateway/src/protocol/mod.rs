//! Wire protocol
//!
//! One JSON `{type, payload}` envelope per WebSocket text frame, no
//! batching, no compression.

mod envelope;
pub mod types;

pub use envelope::{ActionEnvelope, EnvelopeParseError};
