//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required (stored token has been cleared)
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied (stored token has been cleared)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error, carries the server's message
    #[error("Validation error: {0}")]
    Validation(String),

    /// Server-side failure
    #[error("Server error: {0}")]
    Server(String),

    /// Local persistence (cart snapshot, session token) failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the caller should send the user back to the login screen
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Forbidden(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
