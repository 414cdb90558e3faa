//! Shared gateway state
//!
//! One `GatewayState` is built at startup and cloned into every socket task
//! and axum handler. All fields are `Arc`s, so a clone is cheap.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::apps::AppRegistry;
use crate::connection::ConnectionRegistry;
use crate::error::GatewayResult;
use lobby_common::AppConfig;
use lobby_core::{AppSessionStore, LobbyId, LobbyStore};

/// Application state shared across connections
#[derive(Clone)]
pub struct GatewayState {
    pub lobbies: Arc<dyn LobbyStore>,
    pub sessions: Arc<dyn AppSessionStore>,
    pub apps: Arc<AppRegistry>,
    pub connections: Arc<ConnectionRegistry>,
    /// Per-lobby serialization locks; see [`GatewayState::lobby_lock`]
    pub lobby_locks: Arc<DashMap<LobbyId, Arc<Mutex<()>>>>,
    pub config: Arc<AppConfig>,
}

impl GatewayState {
    pub fn new(
        lobbies: Arc<dyn LobbyStore>,
        sessions: Arc<dyn AppSessionStore>,
        apps: AppRegistry,
        config: AppConfig,
    ) -> Self {
        Self {
            lobbies,
            sessions,
            apps: Arc::new(apps),
            connections: ConnectionRegistry::new_shared(),
            lobby_locks: Arc::new(DashMap::new()),
            config: Arc::new(config),
        }
    }

    /// The serialization lock for one lobby
    ///
    /// App actions hold this across the fetch-handle-commit cycle so two
    /// concurrent actions on the same lobby can never lose each other's
    /// session writes. Locks are created on first use and kept for the
    /// process lifetime; lobby counts are small enough not to reap them.
    pub fn lobby_lock(&self, lobby_id: LobbyId) -> Arc<Mutex<()>> {
        self.lobby_locks
            .entry(lobby_id)
            .or_default()
            .clone()
    }

    /// Tear down a lobby's app session via the app's terminate hook
    pub async fn terminate_app(&self, lobby_id: LobbyId, app_name: &str) -> GatewayResult<()> {
        let app = self.apps.lookup(app_name)?;
        let _guard = self.lobby_lock(lobby_id).lock_owned().await;
        app.on_terminate(lobby_id, self.sessions.as_ref()).await?;
        tracing::info!(lobby_id = %lobby_id, app = app_name, "App session terminated");
        Ok(())
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("apps", &self.apps)
            .field("connections", &self.connections.count())
            .finish_non_exhaustive()
    }
}
