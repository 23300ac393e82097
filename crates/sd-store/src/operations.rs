//! Dispatchable operations and their HTTP execution.
//!
//! Each operation issues exactly one backend call and turns the parsed body
//! into an [`Outcome`] for its slice. No retries.

use sd_api_client::{ApiClient, ApiError, RememberMe};
use shared_types::{
    AccountPatch, Credentials, EmployeePatch, EntityId, OperationKind, PositionPatch,
    ProjectPatch, RoleAssignment, SkillPatch,
};
use std::sync::Arc;

use crate::actions::Outcome;
use crate::domain::slices::{
    AccountsOutcome, AuthOutcome, EmployeesOutcome, PositionsOutcome, ProfileOutcome,
    ProjectsOutcome, SkillsOutcome,
};

/// Everything operations need at execution time.
pub struct StoreContext {
    pub api: Arc<ApiClient>,
    /// Where login stores remembered credentials. Without it `remember` is
    /// ignored.
    pub remember_me: Option<RememberMe>,
}

impl StoreContext {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            remember_me: None,
        }
    }

    #[must_use]
    pub fn with_remember_me(mut self, remember_me: RememberMe) -> Self {
        self.remember_me = Some(remember_me);
        self
    }
}

/// An operation together with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    FetchAccounts,
    FetchEmployeesWithoutAccount,
    AddAccount(AccountPatch),
    UpdateAccount { id: EntityId, patch: AccountPatch },
    DeleteAccount(EntityId),

    FetchEmployees,
    FetchEmployeePositions,
    AddEmployee(EmployeePatch),
    UpdateEmployee { id: EntityId, patch: EmployeePatch },
    DeleteEmployee(EntityId),

    FetchPositions,
    AddPosition(PositionPatch),
    UpdatePosition { id: EntityId, patch: PositionPatch },
    DeletePosition(EntityId),

    FetchSkills,
    AddSkill(SkillPatch),
    UpdateSkill { id: EntityId, patch: SkillPatch },
    DeleteSkill(EntityId),

    FetchProjects,
    AddProject(ProjectPatch),
    UpdateProject { id: EntityId, patch: ProjectPatch },
    DeleteProject(EntityId),
    RestoreProject(EntityId),
    FetchProjectEmployees(EntityId),
    FetchProject(EntityId),
    UpdateMemberRole {
        project: EntityId,
        assignment: RoleAssignment,
    },
    FetchProjectsByAccount(EntityId),
    FetchProjectsByEmployee(EntityId),

    /// Exchange credentials for a token. With `remember`, the credentials
    /// are kept for the next login; without it any kept ones are removed.
    Login {
        credentials: Credentials,
        remember: bool,
    },

    FetchProfile(EntityId),
    FetchProfileSkills,
    UpdateProfileEmployee { id: EntityId, patch: EmployeePatch },
}

impl Operation {
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::FetchAccounts => OperationKind::FetchAccounts,
            Operation::FetchEmployeesWithoutAccount => OperationKind::FetchEmployeesWithoutAccount,
            Operation::AddAccount(_) => OperationKind::AddAccount,
            Operation::UpdateAccount { .. } => OperationKind::UpdateAccount,
            Operation::DeleteAccount(_) => OperationKind::DeleteAccount,
            Operation::FetchEmployees => OperationKind::FetchEmployees,
            Operation::FetchEmployeePositions => OperationKind::FetchEmployeePositions,
            Operation::AddEmployee(_) => OperationKind::AddEmployee,
            Operation::UpdateEmployee { .. } => OperationKind::UpdateEmployee,
            Operation::DeleteEmployee(_) => OperationKind::DeleteEmployee,
            Operation::FetchPositions => OperationKind::FetchPositions,
            Operation::AddPosition(_) => OperationKind::AddPosition,
            Operation::UpdatePosition { .. } => OperationKind::UpdatePosition,
            Operation::DeletePosition(_) => OperationKind::DeletePosition,
            Operation::FetchSkills => OperationKind::FetchSkills,
            Operation::AddSkill(_) => OperationKind::AddSkill,
            Operation::UpdateSkill { .. } => OperationKind::UpdateSkill,
            Operation::DeleteSkill(_) => OperationKind::DeleteSkill,
            Operation::FetchProjects => OperationKind::FetchProjects,
            Operation::AddProject(_) => OperationKind::AddProject,
            Operation::UpdateProject { .. } => OperationKind::UpdateProject,
            Operation::DeleteProject(_) => OperationKind::DeleteProject,
            Operation::RestoreProject(_) => OperationKind::RestoreProject,
            Operation::FetchProjectEmployees(_) => OperationKind::FetchProjectEmployees,
            Operation::FetchProject(_) => OperationKind::FetchProject,
            Operation::UpdateMemberRole { .. } => OperationKind::UpdateMemberRole,
            Operation::FetchProjectsByAccount(_) => OperationKind::FetchProjectsByAccount,
            Operation::FetchProjectsByEmployee(_) => OperationKind::FetchProjectsByEmployee,
            Operation::Login { .. } => OperationKind::Login,
            Operation::FetchProfile(_) => OperationKind::FetchProfile,
            Operation::FetchProfileSkills => OperationKind::FetchProfileSkills,
            Operation::UpdateProfileEmployee { .. } => OperationKind::UpdateProfileEmployee,
        }
    }

    pub(crate) async fn execute(self, context: &StoreContext) -> Result<Outcome, ApiError> {
        let api = &context.api;
        let outcome = match self {
            // Accounts
            Operation::FetchAccounts => {
                Outcome::Accounts(AccountsOutcome::Fetched(api.fetch_accounts().await?))
            }
            Operation::FetchEmployeesWithoutAccount => Outcome::Accounts(
                AccountsOutcome::EmployeesWithoutAccount(api.fetch_employees_without_account().await?),
            ),
            Operation::AddAccount(patch) => {
                Outcome::Accounts(AccountsOutcome::Added(api.add_account(&patch).await?))
            }
            Operation::UpdateAccount { id, patch } => {
                Outcome::Accounts(AccountsOutcome::Updated(api.update_account(&id, &patch).await?))
            }
            Operation::DeleteAccount(id) => {
                api.delete_account(&id).await?;
                Outcome::Accounts(AccountsOutcome::Deleted(id))
            }

            // Employees
            Operation::FetchEmployees => {
                Outcome::Employees(EmployeesOutcome::Fetched(api.fetch_employees().await?))
            }
            Operation::FetchEmployeePositions => {
                Outcome::Employees(EmployeesOutcome::Positions(api.fetch_positions().await?))
            }
            Operation::AddEmployee(patch) => {
                Outcome::Employees(EmployeesOutcome::Added(api.add_employee(&patch).await?))
            }
            Operation::UpdateEmployee { id, patch } => Outcome::Employees(
                EmployeesOutcome::Updated(api.update_employee(&id, &patch).await?),
            ),
            Operation::DeleteEmployee(id) => {
                api.delete_employee(&id).await?;
                Outcome::Employees(EmployeesOutcome::Deleted(id))
            }

            // Positions
            Operation::FetchPositions => {
                Outcome::Positions(PositionsOutcome::Fetched(api.fetch_positions().await?))
            }
            Operation::AddPosition(patch) => {
                Outcome::Positions(PositionsOutcome::Added(api.add_position(&patch).await?))
            }
            Operation::UpdatePosition { id, patch } => Outcome::Positions(
                PositionsOutcome::Updated(api.update_position(&id, &patch).await?),
            ),
            Operation::DeletePosition(id) => {
                api.delete_position(&id).await?;
                Outcome::Positions(PositionsOutcome::Deleted(id))
            }

            // Skills
            Operation::FetchSkills => {
                Outcome::Skills(SkillsOutcome::Fetched(api.fetch_skills().await?))
            }
            Operation::AddSkill(patch) => {
                Outcome::Skills(SkillsOutcome::Added(api.add_skill(&patch).await?))
            }
            Operation::UpdateSkill { id, patch } => {
                Outcome::Skills(SkillsOutcome::Updated(api.update_skill(&id, &patch).await?))
            }
            Operation::DeleteSkill(id) => {
                api.delete_skill(&id).await?;
                Outcome::Skills(SkillsOutcome::Deleted(id))
            }

            // Projects
            Operation::FetchProjects => {
                Outcome::Projects(ProjectsOutcome::Listed(api.fetch_projects().await?))
            }
            Operation::AddProject(patch) => {
                Outcome::Projects(ProjectsOutcome::Added(api.add_project(&patch).await?))
            }
            Operation::UpdateProject { id, patch } => {
                Outcome::Projects(ProjectsOutcome::Updated(api.update_project(&id, &patch).await?))
            }
            Operation::DeleteProject(id) => {
                Outcome::Projects(ProjectsOutcome::Flagged(api.delete_project(&id).await?))
            }
            Operation::RestoreProject(id) => {
                Outcome::Projects(ProjectsOutcome::Flagged(api.restore_project(&id).await?))
            }
            Operation::FetchProjectEmployees(id) => Outcome::Projects(ProjectsOutcome::Members(
                api.fetch_project_employees(&id).await?,
            )),
            Operation::FetchProject(id) => {
                Outcome::Projects(ProjectsOutcome::Loaded(api.fetch_project(&id).await?))
            }
            Operation::UpdateMemberRole {
                project,
                assignment,
            } => Outcome::Projects(ProjectsOutcome::RoleUpdated(
                api.update_member_role(&project, &assignment).await?,
            )),
            Operation::FetchProjectsByAccount(id) => Outcome::Projects(ProjectsOutcome::Listed(
                api.fetch_projects_by_account(&id).await?,
            )),
            Operation::FetchProjectsByEmployee(id) => Outcome::Projects(ProjectsOutcome::Listed(
                api.fetch_projects_by_employee(&id).await?,
            )),

            // Auth
            Operation::Login {
                credentials,
                remember,
            } => {
                let response = api.login(&credentials).await?;
                api.store_token(&response.access_token)?;
                if let Some(vault) = &context.remember_me {
                    if remember {
                        vault.remember(&credentials.email, &credentials.password)?;
                    } else {
                        vault.forget()?;
                    }
                }
                Outcome::Auth(AuthOutcome::LoggedIn {
                    access_token: response.access_token,
                })
            }

            // Profile
            Operation::FetchProfile(id) => {
                Outcome::Profile(ProfileOutcome::Loaded(api.fetch_account(&id).await?))
            }
            Operation::FetchProfileSkills => {
                Outcome::Profile(ProfileOutcome::Skills(api.fetch_skills().await?))
            }
            Operation::UpdateProfileEmployee { id, patch } => Outcome::Profile(
                ProfileOutcome::EmployeeUpdated(api.update_employee(&id, &patch).await?),
            ),
        };
        Ok(outcome)
    }
}
