//! # StaffDesk API Client
//!
//! The single outbound gateway to the StaffDesk backend.
//!
//! ## Components
//!
//! | Module | Role |
//! |--------|------|
//! | `client` | Request pipeline: token check, headers, typed decoding |
//! | `endpoints` | One method per backend call |
//! | `token` | JWT claim decoding and expiry |
//! | `storage` | Persisted key/value state (token, remember-me) |
//! | `vault` | Encrypted remember-me credentials |
//! | `mailer` | Password reset and assignment mail |
//! | `ports` | Login redirect and time source |
//!
//! ## Expired tokens
//!
//! An expired (or unreadable) token is removed from storage, the login
//! redirect fires and `StoreEvent::SessionExpired` is published. The request
//! itself then follows [`ExpiredTokenPolicy`]: aborted by default, or sent
//! without credentials.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod mailer;
pub mod ports;
pub mod storage;
pub mod token;
pub mod vault;

pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError, ExpiredTokenPolicy, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use mailer::{
    AssignmentChange, EmailJsMailer, LogMailer, MailError, MailerConfig, Notification,
    NotificationMailer, RecordingMailer,
};
pub use ports::{
    FixedTimeSource, LogRedirect, LoginRedirect, RecordingRedirect, SystemTimeSource, TimeSource,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use token::Claims;
pub use vault::{RememberMe, SavedCredentials, VaultConfig};
