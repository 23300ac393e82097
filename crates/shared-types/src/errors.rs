//! # Error Types
//!
//! Errors shared by every crate that builds requests from user input.

use thiserror::Error;

/// Rejected record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityIdError {
    /// Blank identifier.
    #[error("Identifier must not be empty")]
    Empty,

    /// Identifier would break out of its path segment.
    #[error("Identifier {id:?} contains invalid character {found:?}")]
    InvalidCharacter { id: String, found: char },
}

/// Rejected create/update payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The payload is not valid JSON for the target type.
    #[error("Invalid {noun} payload: {reason}")]
    Malformed { noun: &'static str, reason: String },

    /// An update that would change nothing.
    #[error("Empty {noun} payload: at least one field is required")]
    Empty { noun: &'static str },
}
