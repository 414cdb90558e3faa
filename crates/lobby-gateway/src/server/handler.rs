//! WebSocket upgrade and socket task wiring
//!
//! One read task and one write task per socket, bridged by the connection's
//! outbound mpsc channel. The read task feeds the dispatcher and refreshes
//! liveness on pong; the write task maps outbound values onto WS frames.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::connection::Outbound;
use crate::handlers;
use crate::server::GatewayState;

/// Outbound queue depth per connection; a client this far behind is better
/// served by the heartbeat reaping it.
const OUTBOUND_BUFFER: usize = 100;

/// `GET /gateway` upgrade handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: GatewayState) {
    let (mut ws_sink, mut ws_stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Outbound>(OUTBOUND_BUFFER);
    let conn = state.connections.register(tx);
    let session_id = conn.session_id().to_string();
    tracing::info!(session_id = %session_id, "WebSocket connected");

    let mut write_task = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            let frame = match outbound {
                Outbound::Action(envelope) => match envelope.to_json() {
                    Ok(text) => Message::Text(text),
                    Err(err) => {
                        tracing::error!(error = %err, "Could not serialize outbound action");
                        continue;
                    }
                },
                Outbound::Ping => Message::Ping(Vec::new()),
                Outbound::Close => break,
            };
            if ws_sink.send(frame).await.is_err() {
                break;
            }
        }
        let _ = ws_sink.close().await;
    });

    let read_state = state.clone();
    let read_conn = Arc::clone(&conn);
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = ws_stream.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    handlers::dispatch(&read_state, &read_conn, &text).await;
                }
                Ok(Message::Pong(_)) => read_conn.mark_alive(),
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    });

    // Whichever side finishes first tears the other down.
    tokio::select! {
        _ = &mut write_task => read_task.abort(),
        _ = &mut read_task => write_task.abort(),
    }

    state.connections.unregister(&session_id);
    tracing::info!(session_id = %session_id, "WebSocket disconnected");
}
