use thiserror::Error;

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur against the language-server session
#[derive(Error, Debug)]
pub enum SessionError {
    /// The session is not in the connected state
    #[error("language server session is not connected")]
    NotConnected,

    /// The transport failed mid-call (timeout, crash, malformed payload)
    #[error("transport error: {0}")]
    Transport(String),

    /// The server could not be initialized
    #[error("initialize failed: {0}")]
    InitializeFailed(String),
}

impl SessionError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}
