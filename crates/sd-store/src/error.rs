//! Store errors.

use sd_api_client::ApiError;
use shared_types::OperationKind;
use thiserror::Error;

/// Value a rejected operation resolves to.
///
/// Carries the server's `message` when there was one, otherwise the
/// operation's fallback text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", operation.action_type())]
pub struct Rejection {
    pub operation: OperationKind,
    pub message: String,
    /// HTTP status, when the server answered.
    pub status: Option<u16>,
}

impl Rejection {
    pub(crate) fn from_api(operation: OperationKind, error: &ApiError) -> Self {
        let message = match error {
            ApiError::SessionExpired => error.to_string(),
            _ => error
                .server_message()
                .map_or_else(|| operation.fallback_message(), str::to_string),
        };
        Self {
            operation,
            message,
            status: error.status(),
        }
    }

    pub(crate) fn store_stopped(operation: OperationKind) -> Self {
        Self {
            operation,
            message: operation.fallback_message(),
            status: None,
        }
    }

    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        self.status == Some(401) || self.message == ApiError::SessionExpired.to_string()
    }
}

/// Errors from talking to the store itself.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store task has stopped; no further actions are applied.
    #[error("store task has stopped")]
    Closed,

    /// Session storage failed outside of an operation (logout).
    #[error(transparent)]
    Api(#[from] ApiError),
}
