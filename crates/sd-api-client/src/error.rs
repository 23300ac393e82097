//! API client errors.

use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Errors from a backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("server responded {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        /// `message` field of the error body, when there is one.
        message: Option<String>,
    },

    /// 2xx response whose body does not have the expected shape.
    #[error("unexpected response from {path}: {reason}")]
    Decode { path: String, reason: String },

    /// The persisted token had expired; the request was not sent.
    #[error("session expired, log in again")]
    SessionExpired,

    /// The request URL could not be built.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// Token storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The client was built from invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// The message the server attached to a rejected request.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// HTTP status of a rejected request.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Extract `message` from an error body.
///
/// Validation errors carry a list of messages; those are joined.
pub(crate) fn extract_server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(message) if !message.trim().is_empty() => {
            Some(message.clone())
        }
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(serde_json::Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}
