//! Typed StaffDesk endpoints.
//!
//! One method per backend call. Each issues exactly one request.

use shared_types::{
    Account, AccountPatch, Credentials, Employee, EmployeePatch, EntityId, LoginResponse,
    PasswordResetRequest, PasswordResetResponse, Position, PositionPatch, Project, ProjectPatch,
    ProjectUpdate, RoleAssignment, Skill, SkillPatch,
};

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    // =========================================================================
    // ACCOUNTS
    // =========================================================================

    pub async fn fetch_accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.get(&["accounts"]).await
    }

    pub async fn fetch_employees_without_account(&self) -> Result<Vec<Employee>, ApiError> {
        self.get(&["employees", "without-accounts"]).await
    }

    pub async fn add_account(&self, patch: &AccountPatch) -> Result<Account, ApiError> {
        self.post(&["accounts"], patch).await
    }

    pub async fn update_account(
        &self,
        id: &EntityId,
        patch: &AccountPatch,
    ) -> Result<Account, ApiError> {
        self.patch(&["accounts", "update", id.as_str()], Some(patch))
            .await
    }

    pub async fn delete_account(&self, id: &EntityId) -> Result<(), ApiError> {
        self.delete(&["accounts", "delete", id.as_str()]).await
    }

    /// A single account with its employee populated.
    pub async fn fetch_account(&self, id: &EntityId) -> Result<Account, ApiError> {
        self.get_with_query(&["accounts", "account"], &[("id", id.as_str())])
            .await
    }

    /// Ask the server to generate a new password for `email`.
    pub async fn reset_password(&self, email: &str) -> Result<PasswordResetResponse, ApiError> {
        let body = PasswordResetRequest {
            email: email.to_string(),
        };
        self.post(&["accounts", "reset-password"], &body).await
    }

    // =========================================================================
    // EMPLOYEES
    // =========================================================================

    pub async fn fetch_employees(&self) -> Result<Vec<Employee>, ApiError> {
        self.get(&["employees"]).await
    }

    pub async fn add_employee(&self, patch: &EmployeePatch) -> Result<Employee, ApiError> {
        self.post(&["employees", "create"], patch).await
    }

    pub async fn update_employee(
        &self,
        id: &EntityId,
        patch: &EmployeePatch,
    ) -> Result<Employee, ApiError> {
        self.patch(&["employees", "update", id.as_str()], Some(patch))
            .await
    }

    pub async fn delete_employee(&self, id: &EntityId) -> Result<(), ApiError> {
        self.delete(&["employees", "delete", id.as_str()]).await
    }

    // =========================================================================
    // POSITIONS
    // =========================================================================

    pub async fn fetch_positions(&self) -> Result<Vec<Position>, ApiError> {
        self.get(&["positions"]).await
    }

    pub async fn add_position(&self, patch: &PositionPatch) -> Result<Position, ApiError> {
        self.post(&["positions", "create"], patch).await
    }

    pub async fn update_position(
        &self,
        id: &EntityId,
        patch: &PositionPatch,
    ) -> Result<Position, ApiError> {
        self.patch(&["positions", id.as_str()], Some(patch)).await
    }

    pub async fn delete_position(&self, id: &EntityId) -> Result<(), ApiError> {
        self.delete(&["positions", id.as_str()]).await
    }

    // =========================================================================
    // SKILLS
    // =========================================================================

    pub async fn fetch_skills(&self) -> Result<Vec<Skill>, ApiError> {
        self.get(&["skills"]).await
    }

    pub async fn add_skill(&self, patch: &SkillPatch) -> Result<Skill, ApiError> {
        self.post(&["skills", "create"], patch).await
    }

    pub async fn update_skill(&self, id: &EntityId, patch: &SkillPatch) -> Result<Skill, ApiError> {
        self.patch(&["skills", id.as_str()], Some(patch)).await
    }

    pub async fn delete_skill(&self, id: &EntityId) -> Result<(), ApiError> {
        self.delete(&["skills", id.as_str()]).await
    }

    // =========================================================================
    // PROJECTS
    // =========================================================================

    pub async fn fetch_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get(&["projects"]).await
    }

    pub async fn add_project(&self, patch: &ProjectPatch) -> Result<Project, ApiError> {
        self.post(&["projects"], patch).await
    }

    /// Update a project. The response lists the membership changes.
    pub async fn update_project(
        &self,
        id: &EntityId,
        patch: &ProjectPatch,
    ) -> Result<ProjectUpdate, ApiError> {
        self.patch(&["projects", id.as_str()], Some(patch)).await
    }

    /// Soft delete: the server flags the project and returns it.
    pub async fn delete_project(&self, id: &EntityId) -> Result<Project, ApiError> {
        self.patch::<(), _>(&["projects", id.as_str(), "delete"], None)
            .await
    }

    pub async fn restore_project(&self, id: &EntityId) -> Result<Project, ApiError> {
        self.patch::<(), _>(&["projects", id.as_str(), "restore"], None)
            .await
    }

    /// Accounts assigned to a project.
    pub async fn fetch_project_employees(&self, id: &EntityId) -> Result<Vec<Account>, ApiError> {
        self.get(&["projects", id.as_str(), "employees"]).await
    }

    pub async fn fetch_project(&self, id: &EntityId) -> Result<Project, ApiError> {
        self.get(&["projects", id.as_str()]).await
    }

    pub async fn update_member_role(
        &self,
        project: &EntityId,
        assignment: &RoleAssignment,
    ) -> Result<Project, ApiError> {
        self.patch(&["projects", project.as_str(), "employee", "role"], Some(assignment))
            .await
    }

    pub async fn fetch_projects_by_account(&self, id: &EntityId) -> Result<Vec<Project>, ApiError> {
        self.get(&["projects", "by-account", id.as_str()]).await
    }

    pub async fn fetch_projects_by_employee(
        &self,
        id: &EntityId,
    ) -> Result<Vec<Project>, ApiError> {
        self.get(&["projects", "by-employee", id.as_str()]).await
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// Exchange credentials for an access token. Does not persist it.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.post(&["auth", "login"], credentials).await
    }
}
