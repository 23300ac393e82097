//! Client configuration with validation.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://project-be-eight.vercel.app";

/// Value of the `Accept-Language` header the backend expects.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "Eng";

/// What to do with a request whose persisted token turned out to be expired.
///
/// The token is cleared and the login redirect fires in both cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiredTokenPolicy {
    /// Do not send the request; fail it with `ApiError::SessionExpired`.
    #[default]
    Abort,
    /// Send the request without an `Authorization` header.
    SendUnauthenticated,
}

impl std::str::FromStr for ExpiredTokenPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "abort" => Ok(Self::Abort),
            "send-unauthenticated" => Ok(Self::SendUnauthenticated),
            other => Err(ConfigError::Invalid(format!(
                "unknown expired token policy {other:?}"
            ))),
        }
    }
}

/// HTTP client configuration.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend root, e.g. `https://project-be-eight.vercel.app`
    pub base_url: String,
    /// `Accept-Language` header value
    pub accept_language: String,
    /// Whole-request timeout in seconds. `None` keeps the HTTP library default.
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub timeout: Option<Duration>,
    /// Handling of requests made with an expired token
    pub expired_token_policy: ExpiredTokenPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            timeout: None,
            expired_token_policy: ExpiredTokenPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at a specific backend, defaults elsewhere.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// - `SD_API_BASE_URL`: backend root
    /// - `SD_ACCEPT_LANGUAGE`: `Accept-Language` value (default: Eng)
    /// - `SD_HTTP_TIMEOUT_SECS`: whole-request timeout in seconds
    /// - `SD_EXPIRED_TOKEN_POLICY`: `abort` or `send-unauthenticated`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let timeout = match lookup("SD_HTTP_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse().map_err(|e| {
                ConfigError::InvalidTimeout(format!("SD_HTTP_TIMEOUT_SECS={raw:?}: {e}"))
            })?)),
            None => defaults.timeout,
        };

        let expired_token_policy = match lookup("SD_EXPIRED_TOKEN_POLICY") {
            Some(raw) => raw.parse()?,
            None => defaults.expired_token_policy,
        };

        Ok(Self {
            base_url: lookup("SD_API_BASE_URL").unwrap_or(defaults.base_url),
            accept_language: lookup("SD_ACCEPT_LANGUAGE").unwrap_or(defaults.accept_language),
            timeout,
            expired_token_policy,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_base_url()?;

        if self.accept_language.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "accept_language cannot be empty".into(),
            ));
        }

        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(ConfigError::InvalidTimeout("timeout cannot be 0".into()));
            }
        }

        Ok(())
    }

    /// The base URL as a `Url`, normalized to end with `/` so joins keep any
    /// path prefix.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.base_url.trim();
        if raw.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        let mut url =
            Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl(format!("{raw}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(format!(
                "{raw}: scheme must be http or https"
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No backend configured
    #[error("base URL cannot be empty")]
    EmptyBaseUrl,
    /// Backend URL does not parse
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// A secret that must be set is blank
    #[error("{0} cannot be empty")]
    EmptySecret(&'static str),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
