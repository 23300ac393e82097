//! # StaffDesk Store
//!
//! Client-side state for the StaffDesk console, owned by a single task.
//!
//! ## Components
//!
//! | Module | Role |
//! |--------|------|
//! | `domain` | Slices, lifecycles and their reducers (pure) |
//! | `actions` | Pending / fulfilled / rejected actions and outcomes |
//! | `operations` | Operation payloads and their one HTTP call each |
//! | `state` | Root state and the staleness guard |
//! | `store` | The store task and its handle |
//! | `services` | Password reset and assignment mail |
//!
//! ## Usage
//!
//! ```ignore
//! let store = Store::spawn(StoreContext::new(api), bus);
//! let outcome = store.run(Operation::FetchSkills).await??;
//! println!("{} skills", store.snapshot().skills.skills.len());
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod actions;
pub mod domain;
pub mod error;
pub mod operations;
pub mod services;
pub mod state;
pub mod store;

pub use actions::{Action, Outcome};
pub use domain::slices::{
    AccountsOutcome, AccountsState, AuthOutcome, AuthState, EmployeesOutcome, EmployeesState,
    PositionsOutcome, PositionsState, ProfileOutcome, ProfileState, ProjectsOutcome,
    ProjectsState, SkillsOutcome, SkillsState,
};
pub use domain::{Lifecycle, RequestStatus};
pub use error::{Rejection, StoreError};
pub use operations::{Operation, StoreContext};
pub use services::{
    notify_assignments, reset_password, AssignmentNotifier, NotifyReport, ServiceError,
};
pub use state::RootState;
pub use store::{wait_for_terminal, Dispatched, Store, StoreHandle};
