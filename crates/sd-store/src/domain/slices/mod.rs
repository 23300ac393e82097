//! Per-entity state and the reducers that merge fulfilled payloads into it.

pub mod accounts;
pub mod auth;
pub mod employees;
pub mod positions;
pub mod profile;
pub mod projects;
pub mod skills;

pub use accounts::{AccountsOutcome, AccountsState};
pub use auth::{AuthOutcome, AuthState};
pub use employees::{EmployeesOutcome, EmployeesState};
pub use positions::{PositionsOutcome, PositionsState};
pub use profile::{ProfileOutcome, ProfileState};
pub use projects::{ProjectsOutcome, ProjectsState};
pub use skills::{SkillsOutcome, SkillsState};
