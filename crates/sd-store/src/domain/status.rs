//! Request lifecycle tracking.

use serde::{Deserialize, Serialize};
use shared_types::RequestSeq;
use std::fmt;

/// Lifecycle marker of a slice (or of the project detail view).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestStatus::Idle => "idle",
            RequestStatus::Loading => "loading",
            RequestStatus::Succeeded => "succeeded",
            RequestStatus::Failed => "failed",
        })
    }
}

/// Status, last error and the newest request started on one lifecycle.
///
/// Completions of older requests never move the status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    status: RequestStatus,
    error: Option<String>,
    latest: RequestSeq,
}

impl Lifecycle {
    #[must_use]
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Newest request started on this lifecycle.
    #[must_use]
    pub fn latest(&self) -> RequestSeq {
        self.latest
    }

    /// True when no newer request has started since `seq`.
    #[must_use]
    pub fn is_latest(&self, seq: RequestSeq) -> bool {
        seq >= self.latest
    }

    pub(crate) fn start(&mut self, seq: RequestSeq) {
        self.status = RequestStatus::Loading;
        self.error = None;
        self.latest = self.latest.max(seq);
    }

    /// Returns false, leaving the status alone, when `seq` was superseded.
    pub(crate) fn succeed(&mut self, seq: RequestSeq) -> bool {
        if !self.is_latest(seq) {
            return false;
        }
        self.status = RequestStatus::Succeeded;
        true
    }

    /// Returns false, leaving the status alone, when `seq` was superseded.
    pub(crate) fn fail(&mut self, seq: RequestSeq, message: &str) -> bool {
        if !self.is_latest(seq) {
            return false;
        }
        self.status = RequestStatus::Failed;
        self.error = Some(message.to_string());
        true
    }

    /// Back to idle. The sequence high-water mark is kept so that requests
    /// started before the reset still count as superseded by later ones.
    pub(crate) fn reset(&mut self) {
        self.status = RequestStatus::Idle;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle_before_any_request() {
        let lifecycle = Lifecycle::default();
        assert_eq!(lifecycle.status(), RequestStatus::Idle);
        assert_eq!(lifecycle.latest(), RequestSeq::ZERO);
        assert!(lifecycle.is_latest(RequestSeq(1)));
    }

    #[test]
    fn test_start_clears_error() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.start(RequestSeq(1));
        assert!(lifecycle.fail(RequestSeq(1), "boom"));
        assert_eq!(lifecycle.error(), Some("boom"));

        lifecycle.start(RequestSeq(2));
        assert_eq!(lifecycle.status(), RequestStatus::Loading);
        assert_eq!(lifecycle.error(), None);
    }

    #[test]
    fn test_superseded_completion_does_not_move_status() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.start(RequestSeq(1));
        lifecycle.start(RequestSeq(2));

        assert!(!lifecycle.succeed(RequestSeq(1)));
        assert_eq!(lifecycle.status(), RequestStatus::Loading);
        assert!(!lifecycle.fail(RequestSeq(1), "late"));
        assert_eq!(lifecycle.error(), None);

        assert!(lifecycle.succeed(RequestSeq(2)));
        assert_eq!(lifecycle.status(), RequestStatus::Succeeded);
    }

    #[test]
    fn test_out_of_order_start_keeps_high_water_mark() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.start(RequestSeq(5));
        lifecycle.start(RequestSeq(3));
        assert_eq!(lifecycle.latest(), RequestSeq(5));
        assert!(!lifecycle.is_latest(RequestSeq(3)));
    }

    #[test]
    fn test_reset_keeps_sequence() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.start(RequestSeq(4));
        lifecycle.reset();
        assert_eq!(lifecycle.status(), RequestStatus::Idle);
        assert_eq!(lifecycle.latest(), RequestSeq(4));
    }
}
