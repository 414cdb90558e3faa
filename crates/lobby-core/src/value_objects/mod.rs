//! Value objects - identifier newtypes

mod ids;

pub use ids::{LobbyId, UserId};
