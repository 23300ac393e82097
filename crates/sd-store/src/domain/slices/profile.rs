//! Profile slice: the signed-in account and the skill catalogue its forms use.

use serde::Serialize;
use shared_types::{Account, Employee, Ref, Skill};

use crate::domain::status::Lifecycle;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileState {
    pub account: Option<Account>,
    pub skills: Option<Vec<Skill>>,
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileOutcome {
    Loaded(Account),
    Skills(Vec<Skill>),
    EmployeeUpdated(Employee),
}

impl ProfileState {
    pub(crate) fn apply(&mut self, outcome: ProfileOutcome) {
        match outcome {
            ProfileOutcome::Loaded(account) => self.account = Some(account),
            ProfileOutcome::Skills(skills) => self.skills = Some(skills),
            ProfileOutcome::EmployeeUpdated(employee) => {
                if let Some(account) = self.account.as_mut() {
                    account.employee = Some(Ref::from(employee));
                }
            }
        }
    }

    /// The signed-in employee, when the server populated it.
    pub fn employee(&self) -> Option<&Employee> {
        self.account
            .as_ref()
            .and_then(|account| account.employee.as_ref())
            .and_then(Ref::populated)
    }
}
