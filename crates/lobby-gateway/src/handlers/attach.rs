//! `SESSION_ATTACH`: bind an existing lobby member identity to a connection
//!
//! Membership itself is owned by the external lobby service; the gateway
//! resolves the lobby by its share token and only verifies that the claimed
//! user is on the member list before trusting the connection with that
//! identity.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::connection::Connection;
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::types;
use crate::server::GatewayState;
use lobby_core::UserId;

#[derive(Debug, Deserialize)]
struct AttachPayload {
    token: String,
    user_id: UserId,
}

pub async fn handle_session_attach(
    state: &GatewayState,
    conn: &Arc<Connection>,
    payload: &Value,
) -> GatewayResult<()> {
    let result = attach(state, conn, payload).await;
    match &result {
        Ok(fulfilled) => {
            conn.send_action(types::SESSION_ATTACH_FULFILLED, fulfilled.clone())
                .await?;
        }
        Err(err) => {
            conn.send_action(types::SESSION_ATTACH_REJECTED, err.rejection_payload())
                .await?;
        }
    }
    result.map(|_| ())
}

async fn attach(
    state: &GatewayState,
    conn: &Arc<Connection>,
    payload: &Value,
) -> GatewayResult<Value> {
    let body: AttachPayload = serde_json::from_value(payload.clone())
        .map_err(|e| GatewayError::Protocol(e.to_string()))?;

    let lobby = state.lobbies.find_by_token(&body.token).await?;
    let member = lobby
        .member(body.user_id)
        .ok_or(GatewayError::NotMember)?
        .clone();

    conn.attach_member(member.id, member.name.clone(), lobby.id);
    tracing::info!(
        session_id = %conn.session_id(),
        lobby_id = %lobby.id,
        user_id = %member.id,
        "Session attached"
    );

    Ok(json!({
        "user": { "id": member.id, "name": member.name },
        "lobby": { "id": lobby.id, "name": lobby.name },
    }))
}
