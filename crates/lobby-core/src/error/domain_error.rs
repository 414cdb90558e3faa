//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::LobbyId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Lobby not found: {0}")]
    LobbyNotFound(LobbyId),

    #[error("No lobby matches token")]
    UnknownToken,

    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    /// Infrastructure errors wrapped by store implementations
    #[error("Store error: {0}")]
    Backend(String),
}

impl DomainError {
    /// Stable error code string carried in rejection payloads
    pub fn code(&self) -> &'static str {
        match self {
            Self::LobbyNotFound(_) | Self::UnknownToken => "ENOLOBBY",
            Self::Policy(violation) => violation.code(),
            Self::Backend(_) => "ESTORE",
        }
    }
}

/// Preverification gate failure
///
/// Raised by the gate functions in [`crate::policy`] before a lobby
/// lifecycle transition (start/join/leave) is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("Too many lobby members: {actual} (limit {limit})")]
    TooManyMembers { limit: usize, actual: usize },

    #[error("Too few lobby members: {actual} (minimum {limit})")]
    TooFewMembers { limit: usize, actual: usize },

    #[error("Unable to join during app operation")]
    JoinBlocked,

    #[error("Unable to leave during app operation")]
    LeaveBlocked,
}

impl PolicyViolation {
    /// Stable error code string carried in rejection payloads
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooManyMembers { .. } => "ETOOMANY",
            Self::TooFewMembers { .. } => "ETOOFEW",
            Self::JoinBlocked => "ENOHOTJOIN",
            Self::LeaveBlocked => "ENOHOTLEAVE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_codes_are_stable() {
        assert_eq!(
            PolicyViolation::TooManyMembers { limit: 2, actual: 3 }.code(),
            "ETOOMANY"
        );
        assert_eq!(
            PolicyViolation::TooFewMembers { limit: 2, actual: 1 }.code(),
            "ETOOFEW"
        );
        assert_eq!(PolicyViolation::JoinBlocked.code(), "ENOHOTJOIN");
        assert_eq!(PolicyViolation::LeaveBlocked.code(), "ENOHOTLEAVE");
    }

    #[test]
    fn domain_error_codes() {
        assert_eq!(DomainError::LobbyNotFound(LobbyId::generate()).code(), "ENOLOBBY");
        assert_eq!(DomainError::UnknownToken.code(), "ENOLOBBY");
        assert_eq!(DomainError::Backend("io".to_string()).code(), "ESTORE");
        assert_eq!(DomainError::Policy(PolicyViolation::JoinBlocked).code(), "ENOHOTJOIN");
    }

    #[test]
    fn violation_display_names_bounds() {
        let err = PolicyViolation::TooManyMembers { limit: 2, actual: 5 };
        assert_eq!(err.to_string(), "Too many lobby members: 5 (limit 2)");
    }
}
