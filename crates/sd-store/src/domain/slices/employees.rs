//! Employees slice. Also carries the position list used by employee forms.

use serde::Serialize;
use shared_types::{Employee, EntityId, Position};

use crate::domain::collection::{remove_by_id, replace_by_id};
use crate::domain::status::Lifecycle;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmployeesState {
    pub employees: Vec<Employee>,
    pub positions: Vec<Position>,
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmployeesOutcome {
    Fetched(Vec<Employee>),
    Positions(Vec<Position>),
    Added(Employee),
    Updated(Employee),
    Deleted(EntityId),
}

impl EmployeesState {
    pub(crate) fn apply(&mut self, outcome: EmployeesOutcome) {
        match outcome {
            EmployeesOutcome::Fetched(employees) => self.employees = employees,
            EmployeesOutcome::Positions(positions) => self.positions = positions,
            EmployeesOutcome::Added(employee) => self.employees.push(employee),
            EmployeesOutcome::Updated(employee) => {
                replace_by_id(&mut self.employees, employee);
            }
            EmployeesOutcome::Deleted(id) => {
                remove_by_id(&mut self.employees, &id);
            }
        }
    }
}
