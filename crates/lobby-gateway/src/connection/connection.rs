//! Individual WebSocket connection
//!
//! A `Connection` is the gateway-side handle to one duplex channel: the
//! sender half of the socket task's outbound queue, a liveness flag driven
//! by the heartbeat sweep, and the mutable scratch store the framework
//! handlers write identity into.

use parking_lot::RwLock;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

use crate::error::GatewayError;
use crate::protocol::ActionEnvelope;
use lobby_core::{LobbyId, UserId};

/// Outbound value handed to the socket write task
#[derive(Debug, Clone)]
pub enum Outbound {
    /// A serialized `{type, payload}` action frame
    Action(ActionEnvelope),
    /// WebSocket ping control frame
    Ping,
    /// Close the socket
    Close,
}

/// Per-connection scratch state
///
/// Written by the framework handlers (session attach, observer join) and
/// read when building a session context.
#[derive(Debug, Clone, Default)]
pub struct ConnStore {
    pub user_id: Option<UserId>,
    pub user_name: Option<String>,
    pub lobby_id: Option<LobbyId>,
    pub observer: bool,
}

/// A single WebSocket connection
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Liveness flag: set on pong, cleared when a ping goes out
    alive: AtomicBool,

    /// Mutable scratch store
    store: RwLock<ConnStore>,

    /// Channel to the socket write task
    sender: mpsc::Sender<Outbound>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection handle
    pub fn new(session_id: String, sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            alive: AtomicBool::new(true),
            store: RwLock::new(ConnStore::default()),
            sender,
            created_at: Instant::now(),
        })
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Mark the peer as alive (pong received)
    pub fn mark_alive(&self) {
        self.alive.store(true, Ordering::SeqCst);
    }

    /// Read and clear the liveness flag in one step (heartbeat sweep)
    pub fn take_alive(&self) -> bool {
        self.alive.swap(false, Ordering::SeqCst)
    }

    /// Check the liveness flag without clearing it
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Snapshot the scratch store
    pub fn snapshot_store(&self) -> ConnStore {
        self.store.read().clone()
    }

    /// Lobby this connection is attached to, if any
    pub fn lobby_id(&self) -> Option<LobbyId> {
        self.store.read().lobby_id
    }

    /// Whether this connection observes rather than plays
    pub fn is_observer(&self) -> bool {
        self.store.read().observer
    }

    /// Bind a member identity and lobby to this connection
    pub fn attach_member(&self, user_id: UserId, user_name: impl Into<String>, lobby_id: LobbyId) {
        let mut store = self.store.write();
        store.user_id = Some(user_id);
        store.user_name = Some(user_name.into());
        store.lobby_id = Some(lobby_id);
        store.observer = false;
    }

    /// Attach this connection to a lobby as an observer
    pub fn attach_observer(&self, lobby_id: LobbyId) {
        let mut store = self.store.write();
        store.lobby_id = Some(lobby_id);
        store.observer = true;
    }

    /// Queue an outbound value for the socket write task
    pub async fn send(&self, outbound: Outbound) -> Result<(), GatewayError> {
        self.sender
            .send(outbound)
            .await
            .map_err(|_| GatewayError::ChannelClosed)
    }

    /// Serialize and queue a `{type, payload}` action
    pub async fn send_action(&self, kind: &str, payload: Value) -> Result<(), GatewayError> {
        if kind.is_empty() {
            return Err(GatewayError::InvalidAction);
        }
        let envelope = ActionEnvelope::new(kind, payload);
        tracing::trace!(session_id = %self.session_id, action = %envelope.kind, "=>");
        self.send(Outbound::Action(envelope)).await
    }

    /// Check if the sender channel is closed
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Get connection age
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("alive", &self.is_alive())
            .field("created_at", &self.created_at)
            .finish()
    }
}
