//! Action dispatch
//!
//! Entry point for every text frame a socket task reads: parse the envelope,
//! route framework actions directly, and hand app actions to whichever
//! registered app owns the type. The dispatcher is the terminal point for
//! errors: rejections have already been sent to the issuer by the time an
//! error reaches here, so all that is left is logging.

pub mod attach;
pub mod observer;

pub use attach::handle_session_attach;
pub use observer::handle_observer_join;

use std::sync::Arc;

use crate::apps::{LobbyApp, SessionContext};
use crate::connection::Connection;
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::{types, ActionEnvelope};
use crate::server::GatewayState;

/// Dispatch one raw text frame from a connection
///
/// Never returns an error: parse failures and handler failures alike are
/// logged here and must not tear the connection down.
pub async fn dispatch(state: &GatewayState, conn: &Arc<Connection>, text: &str) {
    let envelope = match ActionEnvelope::parse(text) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!(
                session_id = %conn.session_id(),
                error = %err,
                "Dropping unparseable frame"
            );
            return;
        }
    };

    let result = route(state, conn, &envelope).await;
    if let Err(err) = result {
        tracing::warn!(
            session_id = %conn.session_id(),
            action = %envelope.kind,
            code = err.code(),
            error = %err,
            "Action rejected"
        );
    }
}

async fn route(
    state: &GatewayState,
    conn: &Arc<Connection>,
    envelope: &ActionEnvelope,
) -> GatewayResult<()> {
    match envelope.kind.as_str() {
        types::SESSION_ATTACH => handle_session_attach(state, conn, &envelope.payload).await,
        types::OBSERVER_JOIN => handle_observer_join(state, conn, &envelope.payload).await,
        action_type => match state.apps.resolve_action(action_type) {
            Some(app) => dispatch_app(state, conn, app, envelope).await,
            // Unknown types are dropped, not answered: there is no app to
            // phrase a rejection for.
            None => {
                tracing::debug!(
                    session_id = %conn.session_id(),
                    action = action_type,
                    "Unknown action type, dropped"
                );
                Ok(())
            }
        },
    }
}

/// Run an app handler under the lobby's serialization lock
async fn dispatch_app(
    state: &GatewayState,
    conn: &Arc<Connection>,
    app: Arc<dyn LobbyApp>,
    envelope: &ActionEnvelope,
) -> GatewayResult<()> {
    let lobby_id = match conn.lobby_id() {
        Some(lobby_id) => lobby_id,
        None => {
            let err = GatewayError::NoLobby;
            conn.send_action(&types::rejected(&envelope.kind), err.rejection_payload())
                .await?;
            return Err(err);
        }
    };

    // Held across fetch, handle, and commit so concurrent actions on the
    // same lobby cannot lose each other's session writes.
    let _guard = state.lobby_lock(lobby_id).lock_owned().await;

    let mut ctx = match SessionContext::build(state, Arc::clone(conn), app.descriptor()).await {
        Ok(ctx) => ctx,
        Err(err) => {
            conn.send_action(&types::rejected(&envelope.kind), err.rejection_payload())
                .await?;
            return Err(err);
        }
    };
    app.handle(&envelope.kind, &envelope.payload, &mut ctx).await
}
