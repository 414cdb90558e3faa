//! Membership preverification gate
//!
//! Pure predicate functions the lobby lifecycle service calls before
//! committing a start/join/leave transition. They are synchronous,
//! side-effect free, and must be re-evaluated against the lobby state at
//! the moment of the transition; results are never cached.

use crate::entities::{AppDescriptor, Lobby};
use crate::error::PolicyViolation;

/// Can the app be started in this lobby?
///
/// Fails when the member count is outside the descriptor's `users_limit`.
pub fn can_start(lobby: &Lobby, app: &AppDescriptor) -> Result<(), PolicyViolation> {
    let count = lobby.member_count();
    if count > app.users_limit.max {
        return Err(PolicyViolation::TooManyMembers {
            limit: app.users_limit.max,
            actual: count,
        });
    }
    if count < app.users_limit.min {
        return Err(PolicyViolation::TooFewMembers {
            limit: app.users_limit.min,
            actual: count,
        });
    }
    Ok(())
}

/// Can one more user join while the app is active?
pub fn can_join(lobby: &Lobby, app: &AppDescriptor) -> Result<(), PolicyViolation> {
    if !app.hot_join {
        return Err(PolicyViolation::JoinBlocked);
    }
    let joined = lobby.member_count() + 1;
    if joined > app.users_limit.max {
        return Err(PolicyViolation::TooManyMembers {
            limit: app.users_limit.max,
            actual: joined,
        });
    }
    Ok(())
}

/// Can a member leave while the app is active?
pub fn can_leave(lobby: &Lobby, app: &AppDescriptor) -> Result<(), PolicyViolation> {
    if !app.hot_leave {
        return Err(PolicyViolation::LeaveBlocked);
    }
    let remaining = lobby.member_count().saturating_sub(1);
    if remaining < app.users_limit.min {
        return Err(PolicyViolation::TooFewMembers {
            limit: app.users_limit.min,
            actual: remaining,
        });
    }
    Ok(())
}
