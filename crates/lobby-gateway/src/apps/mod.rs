//! Pluggable app framework
//!
//! An app is one mini-game: a static descriptor plus the handlers for its
//! closed set of actions, run against a per-action [`SessionContext`].

pub mod context;
pub mod duel;

pub use context::{CurrentUser, LobbyPeers, SessionContext};

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::GatewayError;
use lobby_core::{AppDescriptor, AppSessionStore, LobbyId};

/// A pluggable lobby app
///
/// Implementations map `(action type, payload)` onto their own action sum
/// type and handle it against the context. `handle` runs with the lobby's
/// serialization lock held, so per-lobby state is never mutated
/// concurrently.
#[async_trait]
pub trait LobbyApp: Send + Sync {
    /// Static registration record
    fn descriptor(&self) -> &AppDescriptor;

    /// Does this app own the given action type?
    fn handles(&self, action_type: &str) -> bool;

    /// Handle one action
    async fn handle(
        &self,
        action_type: &str,
        payload: &Value,
        ctx: &mut SessionContext,
    ) -> Result<(), GatewayError>;

    /// Hook invoked when the lobby disbands; drops the persisted session
    async fn on_terminate(
        &self,
        lobby_id: LobbyId,
        sessions: &dyn AppSessionStore,
    ) -> Result<(), GatewayError> {
        sessions.delete(lobby_id, &self.descriptor().name).await?;
        Ok(())
    }
}

/// Process-wide catalogue of registered apps
///
/// Populated once at startup and injected through the gateway state;
/// immutable afterwards.
#[derive(Default)]
pub struct AppRegistry {
    apps: HashMap<String, Arc<dyn LobbyApp>>,
}

impl AppRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            apps: HashMap::new(),
        }
    }

    /// Register an app; a later registration with the same name wins
    pub fn register(&mut self, app: Arc<dyn LobbyApp>) {
        let name = app.descriptor().name.clone();
        if self.apps.insert(name.clone(), app).is_some() {
            tracing::warn!(app = %name, "App re-registered, previous descriptor replaced");
        } else {
            tracing::info!(app = %name, "App registered");
        }
    }

    /// Look up an app by name
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn LobbyApp>, GatewayError> {
        self.apps
            .get(name)
            .cloned()
            .ok_or_else(|| GatewayError::UnknownApp(name.to_string()))
    }

    /// Find the app that owns an action type
    pub fn resolve_action(&self, action_type: &str) -> Option<Arc<dyn LobbyApp>> {
        self.apps
            .values()
            .find(|app| app.handles(action_type))
            .cloned()
    }

    /// Registered app names
    pub fn names(&self) -> Vec<&str> {
        self.apps.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for AppRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppRegistry")
            .field("apps", &self.names())
            .finish()
    }
}
