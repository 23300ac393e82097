//! Outbound ports for the API client.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// Sends the user back to the login screen.
///
/// Called after an expired token has been cleared.
pub trait LoginRedirect: Send + Sync {
    /// `path` is the request that discovered the expiry.
    fn redirect_to_login(&self, path: &str);
}

/// Redirect for headless use: logs and leaves it to the caller to log in
/// again.
#[derive(Debug, Default)]
pub struct LogRedirect;

impl LoginRedirect for LogRedirect {
    fn redirect_to_login(&self, path: &str) {
        tracing::warn!(path = %path, "Session expired, log in again");
    }
}

/// Redirect that records the paths it was triggered for.
#[derive(Debug, Default)]
pub struct RecordingRedirect {
    paths: Mutex<Vec<String>>,
}

impl RecordingRedirect {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths that triggered a redirect, oldest first.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().map(|p| p.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.paths.lock().map(|p| p.len()).unwrap_or_default()
    }
}

impl LoginRedirect for RecordingRedirect {
    fn redirect_to_login(&self, path: &str) {
        if let Ok(mut paths) = self.paths.lock() {
            paths.push(path.to_string());
        }
    }
}

/// Time source trait for testability
pub trait TimeSource: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now_unix(&self) -> i64;
}

/// System time implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Manually driven clock.
#[derive(Debug, Default)]
pub struct FixedTimeSource {
    now: AtomicI64,
}

impl FixedTimeSource {
    #[must_use]
    pub fn at(now_unix: i64) -> Self {
        Self {
            now: AtomicI64::new(now_unix),
        }
    }

    pub fn set(&self, now_unix: i64) {
        self.now.store(now_unix, Ordering::SeqCst);
    }
}

impl TimeSource for FixedTimeSource {
    fn now_unix(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
