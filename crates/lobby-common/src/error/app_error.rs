//! Application error types
//!
//! Top-level errors for process startup and server wiring. Protocol and
//! game errors live with the gateway; domain errors with `lobby-core`.

use lobby_core::DomainError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
