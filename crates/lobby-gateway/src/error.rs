//! Gateway error taxonomy
//!
//! Every error carries a stable code string; rejected client actions are
//! answered with a `<TYPE>_REJECTED` action whose payload is
//! `{code, message}`, so clients can react deterministically.

use serde_json::json;
use thiserror::Error;

use lobby_core::{DomainError, PolicyViolation};

/// Gateway error type
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed envelope or unserializable payload
    #[error("Malformed action: {0}")]
    Protocol(String),

    /// Missing action type
    #[error("No action type")]
    InvalidAction,

    /// Action addressed to an app that was never registered
    #[error("Unknown app: {0}")]
    UnknownApp(String),

    /// Preverification gate failure
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    /// Game requires an exact member count to start
    #[error("There must be {expected} members in the lobby")]
    InvalidLobbySize { expected: usize, actual: usize },

    /// Game action attempted in the wrong stage
    #[error("Invalid stage!")]
    InvalidStage,

    /// Action reserved for the lobby leader
    #[error("Only the lobby leader can do that")]
    NotLeader,

    /// Connection is not attached to a lobby, or the lobby is gone
    #[error("Lobby does not exist")]
    NoLobby,

    /// Connection has no current-user identity attached
    #[error("No user identity attached to connection")]
    NoIdentity,

    /// Identity does not belong to the lobby's member list
    #[error("User is not a lobby member")]
    NotMember,

    /// Storage collaborator failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Outbound channel to the socket task is gone
    #[error("Connection channel closed")]
    ChannelClosed,
}

impl GatewayError {
    /// Stable error code string for rejection payloads
    pub fn code(&self) -> &'static str {
        match self {
            Self::Protocol(_) => "EPARSEERROR",
            Self::InvalidAction => "EINVACTION",
            Self::UnknownApp(_) => "ENOAPP",
            Self::Policy(violation) => violation.code(),
            Self::InvalidLobbySize { .. } => "EINVLOBBYSIZE",
            Self::InvalidStage => "EINVSTAGE",
            Self::NotLeader => "ENOTLEADER",
            Self::NoLobby => "ENOLOBBY",
            Self::NoIdentity => "ENOUSER",
            Self::NotMember => "ENOTMEMBER",
            Self::Domain(err) => err.code(),
            Self::ChannelClosed => "ECONNCLOSED",
        }
    }

    /// `{code, message}` rejection payload
    #[must_use]
    pub fn rejection_payload(&self) -> serde_json::Value {
        json!({
            "code": self.code(),
            "message": self.to_string(),
        })
    }
}

impl From<crate::protocol::EnvelopeParseError> for GatewayError {
    fn from(err: crate::protocol::EnvelopeParseError) -> Self {
        use crate::protocol::EnvelopeParseError;
        match err {
            EnvelopeParseError::Malformed(e) => Self::Protocol(e.to_string()),
            EnvelopeParseError::MissingType => Self::InvalidAction,
        }
    }
}

/// Gateway result type
pub type GatewayResult<T> = Result<T, GatewayError>;
