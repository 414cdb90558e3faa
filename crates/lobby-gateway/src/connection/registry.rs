//! Connection registry
//!
//! Owns the set of live connections using DashMap for thread-safe access,
//! and runs the process-wide heartbeat sweep.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::interval;

use super::{Connection, Outbound};
use lobby_core::LobbyId;

/// Registry of all live WebSocket connections
pub struct ConnectionRegistry {
    /// Active connections by session ID
    connections: DashMap<String, Arc<Connection>>,
}

impl ConnectionRegistry {
    /// Create a new registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create a new registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection with a fresh session id
    pub fn register(&self, sender: mpsc::Sender<Outbound>) -> Arc<Connection> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let connection = Connection::new(session_id.clone(), sender);
        self.connections.insert(session_id.clone(), connection.clone());

        tracing::debug!(session_id = %session_id, "Connection registered");

        connection
    }

    /// Remove a connection on disconnect, error, or termination
    pub fn unregister(&self, session_id: &str) {
        if self.connections.remove(session_id).is_some() {
            tracing::debug!(session_id = %session_id, "Connection unregistered");
        }
    }

    /// Get a connection by session ID
    pub fn get(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(session_id).map(|r| r.clone())
    }

    /// All connections matching a predicate
    pub fn filtered<F>(&self, predicate: F) -> Vec<Arc<Connection>>
    where
        F: Fn(&Connection) -> bool,
    {
        self.connections
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// All connections currently attached to a lobby (members and observers)
    pub fn in_lobby(&self, lobby_id: LobbyId) -> Vec<Arc<Connection>> {
        self.filtered(|conn| conn.lobby_id() == Some(lobby_id))
    }

    /// The total number of live connections
    pub fn count(&self) -> usize {
        self.connections.len()
    }

    /// One heartbeat sweep over every connection
    ///
    /// A connection still marked alive gets a ping and its flag cleared; a
    /// connection whose flag is already clear missed a pong for a whole
    /// interval and is closed and unregistered. A dead peer is therefore
    /// detected within one interval of its missed pong.
    pub async fn heartbeat_tick(&self) {
        let snapshot: Vec<Arc<Connection>> = self
            .connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        for conn in snapshot {
            if conn.take_alive() {
                if conn.send(Outbound::Ping).await.is_err() {
                    tracing::debug!(
                        session_id = %conn.session_id(),
                        "Ping failed, channel closed"
                    );
                    self.unregister(conn.session_id());
                }
            } else {
                tracing::info!(
                    session_id = %conn.session_id(),
                    "Dead connection terminating"
                );
                let _ = conn.send(Outbound::Close).await;
                self.unregister(conn.session_id());
            }
        }
    }

    /// Spawn the process-wide heartbeat loop
    pub fn spawn_heartbeat(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = interval(period);
            // the first tick fires immediately; skip it so connections get
            // a full interval before their first ping
            ticker.tick().await;
            loop {
                ticker.tick().await;
                registry.heartbeat_tick().await;
            }
        })
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("connections", &self.connections.len())
            .finish()
    }
}
