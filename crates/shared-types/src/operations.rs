//! # Operation Catalogue
//!
//! Names every asynchronous operation the console can dispatch and the slice
//! that owns it. Shared so that the store, the event bus and the CLI agree on
//! naming without depending on each other.
//!
//! | Slice | Operations |
//! |-------|------------|
//! | accounts | fetch, fetch without account, add, update, delete |
//! | employees | fetch, fetch positions, add, update, delete |
//! | positions | fetch, add, update, delete |
//! | skills | fetch, add, update, delete |
//! | projects | fetch, add, update, delete, restore, members, detail, role, by account, by employee |
//! | auth | login |
//! | profile | fetch, fetch skills, update employee |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named partition of client state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceId {
    Accounts,
    Employees,
    Positions,
    Skills,
    Projects,
    Auth,
    Profile,
}

impl SliceId {
    /// Every slice, in store order.
    pub const ALL: [SliceId; 7] = [
        SliceId::Accounts,
        SliceId::Employees,
        SliceId::Positions,
        SliceId::Skills,
        SliceId::Projects,
        SliceId::Auth,
        SliceId::Profile,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SliceId::Accounts => "accounts",
            SliceId::Employees => "employees",
            SliceId::Positions => "positions",
            SliceId::Skills => "skills",
            SliceId::Projects => "projects",
            SliceId::Auth => "auth",
            SliceId::Profile => "profile",
        }
    }
}

impl fmt::Display for SliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monotonically increasing number stamped on every dispatched operation.
///
/// The store remembers the latest read started per [`ReadTarget`]; a read
/// completion carrying an older sequence has been superseded.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RequestSeq(pub u64);

impl RequestSeq {
    /// Sequence before any dispatch.
    pub const ZERO: RequestSeq = RequestSeq(0);

    #[must_use]
    pub const fn next(self) -> RequestSeq {
        RequestSeq(self.0 + 1)
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a completed operation does to its slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Replace a collection wholesale.
    Replace,
    /// Load a single record (profile account, selected project).
    Load,
    /// Append a created record.
    Create,
    /// Patch a record by id.
    Update,
    /// Remove a record by id.
    Delete,
}

impl Effect {
    /// Reads may be superseded and discarded; writes have been committed
    /// server-side and always apply.
    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Effect::Create | Effect::Update | Effect::Delete)
    }
}

/// State field a read replaces wholesale.
///
/// A read is superseded only by a newer read of the same target, so reads
/// that fill different fields of one slice can run side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadTarget {
    Accounts,
    EmployeesWithoutAccount,
    Employees,
    EmployeePositions,
    Positions,
    Skills,
    /// Project list, whichever filter produced it.
    Projects,
    ProjectEmployees,
    SelectedProject,
    ProfileAccount,
    ProfileSkills,
}

/// Every dispatchable operation, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    FetchAccounts,
    FetchEmployeesWithoutAccount,
    AddAccount,
    UpdateAccount,
    DeleteAccount,

    FetchEmployees,
    FetchEmployeePositions,
    AddEmployee,
    UpdateEmployee,
    DeleteEmployee,

    FetchPositions,
    AddPosition,
    UpdatePosition,
    DeletePosition,

    FetchSkills,
    AddSkill,
    UpdateSkill,
    DeleteSkill,

    FetchProjects,
    AddProject,
    UpdateProject,
    DeleteProject,
    RestoreProject,
    FetchProjectEmployees,
    FetchProject,
    UpdateMemberRole,
    FetchProjectsByAccount,
    FetchProjectsByEmployee,

    Login,

    FetchProfile,
    FetchProfileSkills,
    UpdateProfileEmployee,
}

impl OperationKind {
    /// Owning slice.
    #[must_use]
    pub const fn slice(self) -> SliceId {
        use OperationKind::*;
        match self {
            FetchAccounts | FetchEmployeesWithoutAccount | AddAccount | UpdateAccount
            | DeleteAccount => SliceId::Accounts,
            FetchEmployees | FetchEmployeePositions | AddEmployee | UpdateEmployee
            | DeleteEmployee => SliceId::Employees,
            FetchPositions | AddPosition | UpdatePosition | DeletePosition => SliceId::Positions,
            FetchSkills | AddSkill | UpdateSkill | DeleteSkill => SliceId::Skills,
            FetchProjects | AddProject | UpdateProject | DeleteProject | RestoreProject
            | FetchProjectEmployees | FetchProject | UpdateMemberRole
            | FetchProjectsByAccount | FetchProjectsByEmployee => SliceId::Projects,
            Login => SliceId::Auth,
            FetchProfile | FetchProfileSkills | UpdateProfileEmployee => SliceId::Profile,
        }
    }

    #[must_use]
    pub const fn effect(self) -> Effect {
        use OperationKind::*;
        match self {
            FetchAccounts | FetchEmployeesWithoutAccount | FetchEmployees
            | FetchEmployeePositions | FetchPositions | FetchSkills | FetchProjects
            | FetchProjectEmployees | FetchProjectsByAccount | FetchProjectsByEmployee
            | FetchProfileSkills => Effect::Replace,
            FetchProject | FetchProfile => Effect::Load,
            AddAccount | AddEmployee | AddPosition | AddSkill | AddProject | Login => {
                Effect::Create
            }
            UpdateAccount | UpdateEmployee | UpdatePosition | UpdateSkill | UpdateProject
            | RestoreProject | UpdateMemberRole | UpdateProfileEmployee => Effect::Update,
            DeleteAccount | DeleteEmployee | DeletePosition | DeleteSkill => Effect::Delete,
            // Soft delete: the server returns the flagged record.
            DeleteProject => Effect::Update,
        }
    }

    #[must_use]
    pub const fn is_write(self) -> bool {
        self.effect().is_write()
    }

    /// Field this operation replaces, for reads. `None` for writes.
    #[must_use]
    pub const fn read_target(self) -> Option<ReadTarget> {
        use OperationKind::*;
        let target = match self {
            FetchAccounts => ReadTarget::Accounts,
            FetchEmployeesWithoutAccount => ReadTarget::EmployeesWithoutAccount,
            FetchEmployees => ReadTarget::Employees,
            FetchEmployeePositions => ReadTarget::EmployeePositions,
            FetchPositions => ReadTarget::Positions,
            FetchSkills => ReadTarget::Skills,
            FetchProjects | FetchProjectsByAccount | FetchProjectsByEmployee => {
                ReadTarget::Projects
            }
            FetchProjectEmployees => ReadTarget::ProjectEmployees,
            FetchProject => ReadTarget::SelectedProject,
            FetchProfile => ReadTarget::ProfileAccount,
            FetchProfileSkills => ReadTarget::ProfileSkills,
            _ => return None,
        };
        Some(target)
    }

    /// True for operations that run on the project detail lifecycle rather
    /// than the slice status.
    #[must_use]
    pub const fn uses_detail_lifecycle(self) -> bool {
        matches!(self, OperationKind::FetchProject)
    }

    /// Rejection message used when the server gives none.
    #[must_use]
    pub fn fallback_message(self) -> String {
        use OperationKind::*;
        match self {
            AddAccount => "Failed to add account".to_string(),
            AddEmployee => "Failed to add employee".to_string(),
            AddPosition => "Failed to add position".to_string(),
            AddSkill => "Failed to add skill".to_string(),
            AddProject => "Failed to add project".to_string(),
            _ => "An unknown error occurred".to_string(),
        }
    }

    /// `slice/verb` label used in logs and events.
    #[must_use]
    pub const fn action_type(self) -> &'static str {
        use OperationKind::*;
        match self {
            FetchAccounts => "accounts/fetchAll",
            FetchEmployeesWithoutAccount => "accounts/fetchEmployeesWithoutAccount",
            AddAccount => "accounts/add",
            UpdateAccount => "accounts/update",
            DeleteAccount => "accounts/delete",
            FetchEmployees => "employees/fetchAll",
            FetchEmployeePositions => "employees/fetchPositions",
            AddEmployee => "employees/add",
            UpdateEmployee => "employees/update",
            DeleteEmployee => "employees/delete",
            FetchPositions => "positions/fetchAll",
            AddPosition => "positions/add",
            UpdatePosition => "positions/update",
            DeletePosition => "positions/delete",
            FetchSkills => "skills/fetchAll",
            AddSkill => "skills/add",
            UpdateSkill => "skills/update",
            DeleteSkill => "skills/delete",
            FetchProjects => "projects/fetchAll",
            AddProject => "projects/add",
            UpdateProject => "projects/update",
            DeleteProject => "projects/delete",
            RestoreProject => "projects/restore",
            FetchProjectEmployees => "projects/fetchEmployees",
            FetchProject => "projects/fetchById",
            UpdateMemberRole => "projects/updateMemberRole",
            FetchProjectsByAccount => "projects/fetchByAccount",
            FetchProjectsByEmployee => "projects/fetchByEmployee",
            Login => "auth/login",
            FetchProfile => "profile/fetchAccount",
            FetchProfileSkills => "profile/fetchSkills",
            UpdateProfileEmployee => "profile/updateEmployee",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_type())
    }
}
