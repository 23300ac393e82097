//! Accounts slice: login accounts and the employees still without one.

use serde::Serialize;
use shared_types::{Account, Employee, EntityId};

use crate::domain::collection::{remove_by_id, replace_by_id};
use crate::domain::status::Lifecycle;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountsState {
    pub accounts: Vec<Account>,
    pub employees_without_account: Vec<Employee>,
    pub lifecycle: Lifecycle,
}

/// Fulfilled payloads of the accounts operations.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountsOutcome {
    Fetched(Vec<Account>),
    EmployeesWithoutAccount(Vec<Employee>),
    Added(Account),
    Updated(Account),
    Deleted(EntityId),
}

impl AccountsState {
    pub(crate) fn apply(&mut self, outcome: AccountsOutcome) {
        match outcome {
            AccountsOutcome::Fetched(accounts) => self.accounts = accounts,
            AccountsOutcome::EmployeesWithoutAccount(employees) => {
                self.employees_without_account = employees;
            }
            AccountsOutcome::Added(account) => self.accounts.push(account),
            AccountsOutcome::Updated(account) => {
                replace_by_id(&mut self.accounts, account);
            }
            AccountsOutcome::Deleted(id) => {
                remove_by_id(&mut self.accounts, &id);
            }
        }
    }
}
