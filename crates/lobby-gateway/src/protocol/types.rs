//! Framework action type names
//!
//! App-specific types (`DUEL_START`, ...) are declared by each app next to
//! its action sum type; only the names the framework itself dispatches or
//! emits live here.

/// Server push carrying the full current app-session store
pub const APP_UPDATE: &str = "APP_UPDATE";

/// Client request to observe a lobby by token
pub const OBSERVER_JOIN: &str = "OBSERVER_JOIN";
pub const OBSERVER_JOIN_FULFILLED: &str = "OBSERVER_JOIN_FULFILLED";
pub const OBSERVER_JOIN_REJECTED: &str = "OBSERVER_JOIN_REJECTED";

/// Client request to bind an existing member identity to this connection
pub const SESSION_ATTACH: &str = "SESSION_ATTACH";
pub const SESSION_ATTACH_FULFILLED: &str = "SESSION_ATTACH_FULFILLED";
pub const SESSION_ATTACH_REJECTED: &str = "SESSION_ATTACH_REJECTED";

/// `<TYPE>` -> `<TYPE>_REJECTED`
#[must_use]
pub fn rejected(action_type: &str) -> String {
    format!("{action_type}_REJECTED")
}

/// `<TYPE>` -> `<TYPE>_FULFILLED`
#[must_use]
pub fn fulfilled(action_type: &str) -> String {
    format!("{action_type}_FULFILLED")
}
