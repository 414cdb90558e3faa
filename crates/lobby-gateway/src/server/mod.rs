//! Gateway server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::apps::{duel::DuelApp, AppRegistry};
use lobby_common::{AppConfig, AppError};
use lobby_store::{MemoryAppSessionStore, MemoryLobbyStore};

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The app catalogue served by this process
pub fn default_app_registry() -> AppRegistry {
    let mut registry = AppRegistry::new();
    registry.register(Arc::new(DuelApp::new()));
    registry
}

/// Wire up in-memory stores and the default app catalogue
pub fn create_gateway_state(config: AppConfig) -> GatewayState {
    GatewayState::new(
        MemoryLobbyStore::new_shared(),
        MemoryAppSessionStore::new_shared(),
        default_app_registry(),
        config,
    )
}

/// Serve an already-bound listener
///
/// Split out from [`run`] so tests can bind an ephemeral port first.
pub async fn serve(listener: TcpListener, state: GatewayState) -> Result<(), AppError> {
    let interval = Duration::from_millis(state.config.heartbeat.interval_ms);
    // Detached; lives for the process lifetime.
    let _heartbeat = state.connections.spawn_heartbeat(interval);

    let addr = listener.local_addr()?;
    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    let app = create_app(state);
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.gateway.port));
    let state = create_gateway_state(config);

    tracing::info!("Starting gateway server on {}", addr);
    let listener = TcpListener::bind(addr).await?;

    serve(listener, state).await
}
