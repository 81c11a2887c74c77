//! Error types for the browser-host workspace.

use thiserror::Error;

use crate::SessionId;

/// Main error type for browser-host operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Session creation was requested on a disposed host
    #[error("Host is disposed; no new sessions may be created")]
    HostDisposed,

    /// Session not found
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// Session limit reached
    #[error("Session limit reached (max: {0})")]
    SessionLimitReached(usize),

    /// Session factory failed to produce a session
    #[error("Session factory error: {0}")]
    Factory(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
