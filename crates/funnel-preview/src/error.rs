//! Errors returned by the admin API client

use thiserror::Error;

/// Result type alias for API calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS, timeout or protocol failure before a response arrived.
    #[error("Request failed: {0}")]
    Transport(#[from] ureq::Error),

    /// The server answered with a non-2xx status. `from_server` marks a
    /// message taken from the response body rather than the status fallback.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        from_server: bool,
    },

    #[error("Invalid response from server: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(status: u16, body: &str) -> Self {
        match server_message(body) {
            Some(message) => ApiError::Status {
                status,
                message,
                from_server: true,
            },
            None => ApiError::Status {
                status,
                message: format!("Server returned HTTP {status}"),
                from_server: false,
            },
        }
    }

    /// The explanation the server put in its error body, if any.
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message,
                from_server: true,
                ..
            } => Some(message),
            _ => None,
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extract the user-facing message from a JSON error body
/// (`{"error": "..."}` or `{"message": "..."}`).
pub fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
}
