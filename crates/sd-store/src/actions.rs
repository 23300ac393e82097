//! Actions the store task reduces.
//!
//! Every dispatched operation produces exactly two actions: `Pending` when it
//! is dispatched and one of `Fulfilled` / `Rejected` when its request ends.

use shared_types::{OperationKind, RequestSeq, SliceId};

use crate::domain::slices::{
    AccountsOutcome, AuthOutcome, EmployeesOutcome, PositionsOutcome, ProfileOutcome,
    ProjectsOutcome, SkillsOutcome,
};

/// Parsed response of a fulfilled operation, addressed to its slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Accounts(AccountsOutcome),
    Employees(EmployeesOutcome),
    Positions(PositionsOutcome),
    Skills(SkillsOutcome),
    Projects(ProjectsOutcome),
    Auth(AuthOutcome),
    Profile(ProfileOutcome),
}

impl Outcome {
    #[must_use]
    pub fn slice(&self) -> SliceId {
        match self {
            Outcome::Accounts(_) => SliceId::Accounts,
            Outcome::Employees(_) => SliceId::Employees,
            Outcome::Positions(_) => SliceId::Positions,
            Outcome::Skills(_) => SliceId::Skills,
            Outcome::Projects(_) => SliceId::Projects,
            Outcome::Auth(_) => SliceId::Auth,
            Outcome::Profile(_) => SliceId::Profile,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Pending {
        seq: RequestSeq,
        operation: OperationKind,
    },
    Fulfilled {
        seq: RequestSeq,
        operation: OperationKind,
        outcome: Outcome,
    },
    Rejected {
        seq: RequestSeq,
        operation: OperationKind,
        message: String,
    },
    ClearSelectedProject,
    Logout,
    /// The API client found the persisted token expired and cleared it.
    SessionExpired,
    ResetAuth,
}

impl Action {
    /// Label used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Action::Pending { .. } => "pending",
            Action::Fulfilled { .. } => "fulfilled",
            Action::Rejected { .. } => "rejected",
            Action::ClearSelectedProject => "projects/clearSelected",
            Action::Logout => "auth/logout",
            Action::SessionExpired => "auth/sessionExpired",
            Action::ResetAuth => "auth/reset",
        }
    }
}
