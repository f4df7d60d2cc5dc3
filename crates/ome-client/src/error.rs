//! OME client errors

use thiserror::Error;

/// Errors that can occur when interacting with the OpenManage Enterprise API
#[derive(Debug, Error)]
pub enum OmeError {
    /// Network failure talking to OME (connect, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// OME returned 401 (bad credentials, expired or revoked session)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// OME rejected the request because of the entity's current state (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// OME returned any other non-success status
    #[error("OME API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message extracted from the OME error body, verbatim
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request rejected locally before reaching OME
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The caller's cancellation signal fired while waiting
    #[error("Operation cancelled")]
    Cancelled,
}

impl OmeError {
    /// True for 404 responses
    pub fn is_not_found(&self) -> bool {
        matches!(self, OmeError::NotFound(_))
    }

    /// Message suitable for the detail of a diagnostic. OME messages are passed through verbatim.
    pub fn detail(&self) -> String {
        match self {
            OmeError::Api { message, .. } => message.clone(),
            OmeError::NotFound(m)
            | OmeError::Conflict(m)
            | OmeError::Unauthorized(m)
            | OmeError::Transport(m)
            | OmeError::InvalidRequest(m) => m.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for OmeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return OmeError::Api {
                status: e.status().map(|s| s.as_u16()).unwrap_or_default(),
                message: format!("error decoding response body: {}", e),
            };
        }
        OmeError::Transport(e.to_string())
    }
}
