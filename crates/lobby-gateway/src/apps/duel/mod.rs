//! Rock/scissors/paper duel app
//!
//! Reference two-player game: the lobby leader starts a duel between the
//! lobby's two members, each submits moves, and every handled transition is
//! broadcast to the whole lobby as an `APP_UPDATE`.

pub mod state;

pub use state::{DuelFault, DuelState, Move, Outcome, PlayerState, Stage};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{LobbyApp, SessionContext};
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::types;
use lobby_core::{AppDescriptor, UsersLimit};

pub const DUEL_START: &str = "DUEL_START";
pub const DUEL_MOVE: &str = "DUEL_MOVE";

/// Typed view of the duel's incoming actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DuelAction {
    Start,
    Move(Move),
}

#[derive(Deserialize)]
struct MovePayload {
    #[serde(rename = "move")]
    mv: Move,
}

impl DuelAction {
    fn parse(action_type: &str, payload: &Value) -> GatewayResult<Self> {
        match action_type {
            DUEL_START => Ok(Self::Start),
            DUEL_MOVE => {
                let body: MovePayload = serde_json::from_value(payload.clone())
                    .map_err(|e| GatewayError::Protocol(e.to_string()))?;
                Ok(Self::Move(body.mv))
            }
            _ => Err(GatewayError::InvalidAction),
        }
    }
}

impl From<DuelFault> for GatewayError {
    fn from(fault: DuelFault) -> Self {
        match fault {
            DuelFault::WrongStage => Self::InvalidStage,
            DuelFault::NotSeated => Self::NotMember,
        }
    }
}

/// The duel app registration
pub struct DuelApp {
    descriptor: AppDescriptor,
}

impl Default for DuelApp {
    fn default() -> Self {
        Self::new()
    }
}

impl DuelApp {
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: AppDescriptor {
                name: "duel".to_string(),
                users_limit: UsersLimit::exactly(2),
                hot_join: false,
                hot_leave: false,
                exclusive: true,
                default_store: serde_json::to_value(DuelState::default())
                    .unwrap_or(Value::Null),
            },
        }
    }

    fn load_state(ctx: &SessionContext) -> GatewayResult<DuelState> {
        serde_json::from_value(ctx.store().clone())
            .map_err(|e| GatewayError::Protocol(e.to_string()))
    }

    async fn save_and_broadcast(ctx: &mut SessionContext, state: &DuelState) -> GatewayResult<()> {
        let value = serde_json::to_value(state)
            .map_err(|e| GatewayError::Protocol(e.to_string()))?;
        ctx.set_store(value);
        ctx.commit().await?;
        ctx.broadcast_update().await
    }

    async fn start(&self, ctx: &mut SessionContext) -> GatewayResult<()> {
        if !ctx.lobby.is_leader(ctx.current_user.id) {
            return Err(GatewayError::NotLeader);
        }
        let expected = self.descriptor.users_limit.max;
        let actual = ctx.lobby.member_count();
        if actual != expected {
            return Err(GatewayError::InvalidLobbySize { expected, actual });
        }

        let mut state = Self::load_state(ctx)?;
        // Seats follow lobby join order.
        state.begin(ctx.lobby.members[0].id, ctx.lobby.members[1].id)?;

        let value = serde_json::to_value(&state)
            .map_err(|e| GatewayError::Protocol(e.to_string()))?;
        ctx.set_store(value);
        ctx.commit().await?;
        // Confirmation to the initiator first, then the state push everyone
        // else keys off.
        ctx.reply(&types::fulfilled(DUEL_START), Value::Null).await?;
        ctx.broadcast_update().await
    }

    async fn submit_move(&self, ctx: &mut SessionContext, mv: Move) -> GatewayResult<()> {
        let mut state = Self::load_state(ctx)?;
        state.submit(ctx.current_user.id, mv)?;
        Self::save_and_broadcast(ctx, &state).await
    }
}

#[async_trait]
impl LobbyApp for DuelApp {
    fn descriptor(&self) -> &AppDescriptor {
        &self.descriptor
    }

    fn handles(&self, action_type: &str) -> bool {
        matches!(action_type, DUEL_START | DUEL_MOVE)
    }

    async fn handle(
        &self,
        action_type: &str,
        payload: &Value,
        ctx: &mut SessionContext,
    ) -> Result<(), GatewayError> {
        let result = match DuelAction::parse(action_type, payload) {
            Ok(DuelAction::Start) => self.start(ctx).await,
            Ok(DuelAction::Move(mv)) => self.submit_move(ctx, mv).await,
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            // Tell the issuer; peers only ever see accepted transitions.
            if let Err(send_err) = ctx
                .reply(&types::rejected(action_type), err.rejection_payload())
                .await
            {
                tracing::debug!(error = %send_err, "Could not deliver rejection");
            }
        }
        result
    }
}
