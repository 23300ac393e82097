//! # Store Events
//!
//! Lifecycle events published while operations run, plus the session and
//! notification events observers react to.

use serde::{Deserialize, Serialize};
use shared_types::entities::{EntityId, ProjectMessage};
use shared_types::operations::{OperationKind, RequestSeq, SliceId};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreEvent {
    // =========================================================================
    // OPERATION LIFECYCLE
    // =========================================================================
    /// The pending state of an operation was applied.
    OperationStarted {
        seq: RequestSeq,
        operation: OperationKind,
    },

    /// The operation resolved and its payload was merged.
    OperationSucceeded {
        seq: RequestSeq,
        operation: OperationKind,
    },

    /// The operation was rejected.
    OperationFailed {
        seq: RequestSeq,
        operation: OperationKind,
        /// Server-supplied message, or the operation's fallback.
        message: String,
    },

    /// A read completed after a newer read on the same lifecycle had started
    /// and its payload was thrown away.
    StaleResponseDiscarded {
        seq: RequestSeq,
        operation: OperationKind,
        /// The sequence that superseded it.
        latest: RequestSeq,
    },

    // =========================================================================
    // SESSION
    // =========================================================================
    /// The persisted token expired and was cleared.
    SessionExpired {
        /// Request path that triggered the check.
        path: String,
    },

    /// The user logged out.
    LoggedOut,

    // =========================================================================
    // NOTIFICATIONS
    // =========================================================================
    /// A project update changed its membership.
    ProjectAssignmentsChanged {
        project_id: EntityId,
        messages: Vec<ProjectMessage>,
    },
}

impl StoreEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::OperationStarted { operation, .. }
            | Self::OperationSucceeded { operation, .. }
            | Self::OperationFailed { operation, .. }
            | Self::StaleResponseDiscarded { operation, .. } => operation.slice().into(),
            Self::SessionExpired { .. } | Self::LoggedOut => EventTopic::Session,
            Self::ProjectAssignmentsChanged { .. } => EventTopic::Notifications,
        }
    }

    /// Operation this event reports on, if any.
    #[must_use]
    pub fn operation(&self) -> Option<OperationKind> {
        match self {
            Self::OperationStarted { operation, .. }
            | Self::OperationSucceeded { operation, .. }
            | Self::OperationFailed { operation, .. }
            | Self::StaleResponseDiscarded { operation, .. } => Some(*operation),
            Self::SessionExpired { .. }
            | Self::LoggedOut
            | Self::ProjectAssignmentsChanged { .. } => None,
        }
    }

    /// Sequence of the operation this event reports on, if any.
    #[must_use]
    pub fn seq(&self) -> Option<RequestSeq> {
        match self {
            Self::OperationStarted { seq, .. }
            | Self::OperationSucceeded { seq, .. }
            | Self::OperationFailed { seq, .. }
            | Self::StaleResponseDiscarded { seq, .. } => Some(*seq),
            _ => None,
        }
    }

    /// True for the events that end an operation.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::OperationSucceeded { .. }
                | Self::OperationFailed { .. }
                | Self::StaleResponseDiscarded { .. }
        )
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    Accounts,
    Employees,
    Positions,
    Skills,
    Projects,
    Auth,
    Profile,
    /// Token expiry and logout.
    Session,
    /// Outbound notices (assignment mails).
    Notifications,
    /// All events (no filtering).
    All,
}

impl From<SliceId> for EventTopic {
    fn from(slice: SliceId) -> Self {
        match slice {
            SliceId::Accounts => EventTopic::Accounts,
            SliceId::Employees => EventTopic::Employees,
            SliceId::Positions => EventTopic::Positions,
            SliceId::Skills => EventTopic::Skills,
            SliceId::Projects => EventTopic::Projects,
            SliceId::Auth => EventTopic::Auth,
            SliceId::Profile => EventTopic::Profile,
        }
    }
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Operations to include. Empty means every operation; events that are not
    /// about an operation always pass this check.
    pub operations: Vec<OperationKind>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            operations: Vec::new(),
        }
    }

    /// Create a filter for the lifecycle of specific operations.
    #[must_use]
    pub fn operations(operations: Vec<OperationKind>) -> Self {
        Self {
            topics: Vec::new(),
            operations,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &StoreEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let operation_match = self.operations.is_empty()
            || event
                .operation()
                .map_or(true, |op| self.operations.contains(&op));

        topic_match && operation_match
    }
}
