//! Per-action session context
//!
//! Built once per dispatched action while the lobby's serialization lock is
//! held, so everything in here is a consistent snapshot of the lobby.

use std::sync::Arc;

use serde_json::Value;

use crate::connection::{Connection, Outbound};
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::{types, ActionEnvelope};
use crate::server::GatewayState;
use lobby_core::{AppDescriptor, AppSession, AppSessionStore, Lobby, UserId};

/// Identity of the member issuing the action
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
}

/// Connections grouped by role, computed eagerly at build time
#[derive(Clone, Default)]
pub struct LobbyPeers {
    pub all: Vec<Arc<Connection>>,
    pub members: Vec<Arc<Connection>>,
    pub observers: Vec<Arc<Connection>>,
}

/// Everything an app handler needs for one action
pub struct SessionContext {
    pub conn: Arc<Connection>,
    pub current_user: CurrentUser,
    pub lobby: Lobby,
    session: AppSession,
    pub peers: LobbyPeers,
    sessions: Arc<dyn AppSessionStore>,
}

impl SessionContext {
    /// Assemble the context for the current connection's lobby
    ///
    /// Fetches the lobby and the app session (materializing a fresh one from
    /// the descriptor's default store when none is persisted yet) and
    /// partitions the lobby's live connections by role.
    pub async fn build(
        state: &GatewayState,
        conn: Arc<Connection>,
        descriptor: &AppDescriptor,
    ) -> GatewayResult<Self> {
        let store = conn.snapshot_store();
        let lobby_id = store.lobby_id.ok_or(GatewayError::NoLobby)?;
        let user_id = store.user_id.ok_or(GatewayError::NoIdentity)?;
        let user_name = store.user_name.ok_or(GatewayError::NoIdentity)?;

        let lobby = state.lobbies.get_with_members(lobby_id).await?;
        let session = match state.sessions.get(lobby_id, &descriptor.name).await? {
            Some(session) => session,
            None => AppSession::fresh(lobby_id, descriptor),
        };

        let mut peers = LobbyPeers::default();
        for peer in state.connections.in_lobby(lobby_id) {
            if peer.is_observer() {
                peers.observers.push(Arc::clone(&peer));
            } else {
                peers.members.push(Arc::clone(&peer));
            }
            peers.all.push(peer);
        }

        Ok(Self {
            conn,
            current_user: CurrentUser {
                id: user_id,
                name: user_name,
            },
            lobby,
            session,
            peers,
            sessions: Arc::clone(&state.sessions),
        })
    }

    /// The app session's working store
    #[must_use]
    pub fn store(&self) -> &Value {
        &self.session.store
    }

    pub fn set_store(&mut self, store: Value) {
        self.session.store = store;
    }

    /// Persist the working session back to the store
    pub async fn commit(&self) -> GatewayResult<()> {
        self.sessions.upsert(&self.session).await?;
        Ok(())
    }

    /// Drop the persisted session entirely
    pub async fn terminate(&self) -> GatewayResult<()> {
        self.sessions
            .delete(self.session.lobby_id, &self.session.name)
            .await?;
        Ok(())
    }

    /// Send an action back to the issuing connection only
    pub async fn reply(&self, kind: &str, payload: Value) -> GatewayResult<()> {
        self.conn.send_action(kind, payload).await
    }

    /// Send an action to one connection, or fan it out to the whole lobby
    ///
    /// Connections whose channel has gone away are skipped; the heartbeat
    /// sweep reaps them.
    pub async fn broadcast(
        &self,
        kind: &str,
        payload: Value,
        target: Option<&Arc<Connection>>,
    ) -> GatewayResult<()> {
        let envelope = ActionEnvelope::new(kind, payload);
        if let Some(target) = target {
            return target.send(Outbound::Action(envelope)).await;
        }
        for peer in &self.peers.all {
            if let Err(err) = peer.send(Outbound::Action(envelope.clone())).await {
                tracing::debug!(
                    session_id = %peer.session_id(),
                    error = %err,
                    "Skipping unreachable peer during broadcast"
                );
            }
        }
        Ok(())
    }

    /// Broadcast the canonical state snapshot to the whole lobby
    ///
    /// The payload is the session's `store` itself; clients replace their
    /// copy wholesale.
    pub async fn broadcast_update(&self) -> GatewayResult<()> {
        self.broadcast(types::APP_UPDATE, self.session.store.clone(), None)
            .await
    }
}
