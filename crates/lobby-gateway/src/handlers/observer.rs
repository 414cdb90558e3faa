//! `OBSERVER_JOIN`: watch a lobby through its opaque token
//!
//! Observers receive every `APP_UPDATE` for the lobby but are never seated
//! in a game and never counted against the app's user limits.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::connection::Connection;
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::types;
use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
struct ObserverJoinPayload {
    token: String,
}

pub async fn handle_observer_join(
    state: &GatewayState,
    conn: &Arc<Connection>,
    payload: &Value,
) -> GatewayResult<()> {
    let result = observe(state, conn, payload).await;
    match &result {
        Ok(fulfilled) => {
            conn.send_action(types::OBSERVER_JOIN_FULFILLED, fulfilled.clone())
                .await?;
        }
        Err(err) => {
            conn.send_action(types::OBSERVER_JOIN_REJECTED, err.rejection_payload())
                .await?;
        }
    }
    result.map(|_| ())
}

async fn observe(
    state: &GatewayState,
    conn: &Arc<Connection>,
    payload: &Value,
) -> GatewayResult<Value> {
    let body: ObserverJoinPayload = serde_json::from_value(payload.clone())
        .map_err(|e| GatewayError::Protocol(e.to_string()))?;

    let lobby = state.lobbies.find_by_token(&body.token).await?;
    conn.attach_observer(lobby.id);
    tracing::info!(
        session_id = %conn.session_id(),
        lobby_id = %lobby.id,
        "Observer joined"
    );

    Ok(json!({
        "lobby": { "id": lobby.id, "name": lobby.name },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::AppRegistry;
    use crate::connection::Outbound;
    use lobby_common::AppConfig;
    use lobby_core::{AppSessionStore, LobbyMember, LobbyStore, UserId};
    use lobby_store::{MemoryAppSessionStore, MemoryLobbyStore};
    use tokio::sync::mpsc;

    fn state() -> (GatewayState, Arc<MemoryLobbyStore>) {
        let lobbies = Arc::new(MemoryLobbyStore::new());
        let state = GatewayState::new(
            Arc::clone(&lobbies) as Arc<dyn LobbyStore>,
            Arc::new(MemoryAppSessionStore::new()) as Arc<dyn AppSessionStore>,
            AppRegistry::new(),
            AppConfig::default(),
        );
        (state, lobbies)
    }

    #[tokio::test]
    async fn joins_with_a_valid_token() {
        let (state, lobbies) = state();
        let lobby = lobbies.create_lobby("arena", LobbyMember::new(UserId::generate(), "alice"));

        let (tx, mut rx) = mpsc::channel(4);
        let conn = state.connections.register(tx);
        let payload = json!({"token": lobby.token});

        handle_observer_join(&state, &conn, &payload).await.unwrap();

        let store = conn.snapshot_store();
        assert_eq!(store.lobby_id, Some(lobby.id));
        assert!(store.observer);
        assert!(store.user_id.is_none());

        match rx.try_recv().unwrap() {
            Outbound::Action(envelope) => {
                assert_eq!(envelope.kind, types::OBSERVER_JOIN_FULFILLED);
                assert_eq!(envelope.payload["lobby"]["name"], "arena");
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_an_unknown_token() {
        let (state, _lobbies) = state();
        let (tx, mut rx) = mpsc::channel(4);
        let conn = state.connections.register(tx);
        let payload = json!({"token": "no-such-token"});

        let err = handle_observer_join(&state, &conn, &payload)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Domain(_)));
        assert!(conn.snapshot_store().lobby_id.is_none());

        match rx.try_recv().unwrap() {
            Outbound::Action(envelope) => {
                assert_eq!(envelope.kind, types::OBSERVER_JOIN_REJECTED);
            }
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_a_missing_token_field() {
        let (state, _lobbies) = state();
        let (tx, mut rx) = mpsc::channel(4);
        let conn = state.connections.register(tx);

        let err = handle_observer_join(&state, &conn, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Protocol(_)));

        match rx.try_recv().unwrap() {
            Outbound::Action(envelope) => {
                assert_eq!(envelope.payload["code"], "EPARSEERROR");
            }
            other => panic!("expected action, got {other:?}"),
        }
    }
}
