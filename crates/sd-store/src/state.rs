//! # Root State
//!
//! All slices plus the reducer that applies one [`Action`] at a time.
//!
//! ## Staleness guard
//!
//! The newest read started on each [`ReadTarget`] is remembered, and each
//! lifecycle remembers the newest request of any kind started on it.
//!
//! - A read completing after a newer read of the same target started is
//!   discarded: its payload would overwrite newer data. Reads of other
//!   targets on the same slice never supersede it.
//! - Every other completion applies its payload. It moves the status only
//!   when it is still the newest request on its lifecycle.

use serde::Serialize;
use shared_bus::StoreEvent;
use shared_types::{OperationKind, ReadTarget, RequestSeq, SliceId};
use std::collections::HashMap;
use tracing::debug;

use crate::actions::{Action, Outcome};
use crate::domain::slices::{
    AccountsState, AuthState, EmployeesState, PositionsState, ProfileState, ProjectsOutcome,
    ProjectsState, SkillsState,
};
use crate::domain::status::Lifecycle;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RootState {
    pub accounts: AccountsState,
    pub employees: EmployeesState,
    pub positions: PositionsState,
    pub skills: SkillsState,
    pub projects: ProjectsState,
    pub auth: AuthState,
    pub profile: ProfileState,
    /// Newest read started per target.
    #[serde(skip)]
    reads: HashMap<ReadTarget, RequestSeq>,
}

impl RootState {
    /// Status lifecycle of a slice.
    #[must_use]
    pub fn slice_lifecycle(&self, slice: SliceId) -> &Lifecycle {
        match slice {
            SliceId::Accounts => &self.accounts.lifecycle,
            SliceId::Employees => &self.employees.lifecycle,
            SliceId::Positions => &self.positions.lifecycle,
            SliceId::Skills => &self.skills.lifecycle,
            SliceId::Projects => &self.projects.lifecycle,
            SliceId::Auth => &self.auth.lifecycle,
            SliceId::Profile => &self.profile.lifecycle,
        }
    }

    /// Lifecycle an operation runs on.
    #[must_use]
    pub fn lifecycle(&self, operation: OperationKind) -> &Lifecycle {
        if operation.uses_detail_lifecycle() {
            return &self.projects.detail;
        }
        self.slice_lifecycle(operation.slice())
    }

    fn lifecycle_mut(&mut self, operation: OperationKind) -> &mut Lifecycle {
        if operation.uses_detail_lifecycle() {
            return &mut self.projects.detail;
        }
        match operation.slice() {
            SliceId::Accounts => &mut self.accounts.lifecycle,
            SliceId::Employees => &mut self.employees.lifecycle,
            SliceId::Positions => &mut self.positions.lifecycle,
            SliceId::Skills => &mut self.skills.lifecycle,
            SliceId::Projects => &mut self.projects.lifecycle,
            SliceId::Auth => &mut self.auth.lifecycle,
            SliceId::Profile => &mut self.profile.lifecycle,
        }
    }

    /// Apply one action and return the events it produced.
    pub(crate) fn reduce(&mut self, action: Action) -> Vec<StoreEvent> {
        match action {
            Action::Pending { seq, operation } => {
                if let Some(target) = operation.read_target() {
                    let latest = self.reads.entry(target).or_default();
                    *latest = (*latest).max(seq);
                }
                self.lifecycle_mut(operation).start(seq);
                vec![StoreEvent::OperationStarted { seq, operation }]
            }
            Action::Fulfilled {
                seq,
                operation,
                outcome,
            } => {
                if let Some(discarded) = self.discard_if_stale(seq, operation) {
                    return vec![discarded];
                }
                let mut events = vec![StoreEvent::OperationSucceeded { seq, operation }];
                if let Outcome::Projects(ProjectsOutcome::Updated(update)) = &outcome {
                    if !update.messages.is_empty() {
                        events.push(StoreEvent::ProjectAssignmentsChanged {
                            project_id: update.project.id.clone(),
                            messages: update.messages.clone(),
                        });
                    }
                }
                self.apply(outcome);
                if !self.lifecycle_mut(operation).succeed(seq) {
                    debug!(%seq, operation = operation.action_type(), "Applied, status held by newer request");
                }
                events
            }
            Action::Rejected {
                seq,
                operation,
                message,
            } => {
                if let Some(discarded) = self.discard_if_stale(seq, operation) {
                    return vec![discarded];
                }
                if !self.lifecycle_mut(operation).fail(seq, &message) {
                    debug!(%seq, operation = operation.action_type(), "Rejected, status held by newer request");
                }
                vec![StoreEvent::OperationFailed {
                    seq,
                    operation,
                    message,
                }]
            }
            Action::ClearSelectedProject => {
                self.projects.clear_selected();
                Vec::new()
            }
            Action::Logout => {
                self.auth.logout();
                vec![StoreEvent::LoggedOut]
            }
            Action::SessionExpired => {
                self.auth.logout();
                Vec::new()
            }
            Action::ResetAuth => {
                self.auth.reset();
                Vec::new()
            }
        }
    }

    fn discard_if_stale(&self, seq: RequestSeq, operation: OperationKind) -> Option<StoreEvent> {
        let target = operation.read_target()?;
        let latest = self.reads.get(&target).copied().unwrap_or_default();
        if seq >= latest {
            return None;
        }
        debug!(
            %seq,
            %latest,
            operation = operation.action_type(),
            "Discarding superseded response"
        );
        Some(StoreEvent::StaleResponseDiscarded {
            seq,
            operation,
            latest,
        })
    }

    fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Accounts(outcome) => self.accounts.apply(outcome),
            Outcome::Employees(outcome) => self.employees.apply(outcome),
            Outcome::Positions(outcome) => self.positions.apply(outcome),
            Outcome::Skills(outcome) => self.skills.apply(outcome),
            Outcome::Projects(outcome) => self.projects.apply(outcome),
            Outcome::Auth(outcome) => self.auth.apply(outcome),
            Outcome::Profile(outcome) => self.profile.apply(outcome),
        }
    }
}
