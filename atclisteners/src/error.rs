//! Error types for the listener registry

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Heartbeat without a session identifier
    #[error("Session ID required")]
    BadRequest,
}
