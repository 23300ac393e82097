//! Projects slice.
//!
//! The list and the detail view keep separate lifecycles: fetching one
//! project never flips the list spinner. Assignment messages from the last
//! update stay here until the detail view is cleared.

use serde::Serialize;
use shared_types::{Account, Project, ProjectMessage, ProjectUpdate};

use crate::domain::collection::replace_by_id;
use crate::domain::status::Lifecycle;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectsState {
    pub projects: Vec<Project>,
    pub project_employees: Vec<Account>,
    pub selected_project: Option<Project>,
    pub messages: Vec<ProjectMessage>,
    pub lifecycle: Lifecycle,
    pub detail: Lifecycle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectsOutcome {
    /// Result of any list fetch (all, by account, by employee).
    Listed(Vec<Project>),
    Added(Project),
    Updated(ProjectUpdate),
    /// Soft delete and restore both return the flagged record.
    Flagged(Project),
    Members(Vec<Account>),
    Loaded(Project),
    RoleUpdated(Project),
}

impl ProjectsState {
    pub(crate) fn apply(&mut self, outcome: ProjectsOutcome) {
        match outcome {
            ProjectsOutcome::Listed(projects) => self.projects = projects,
            ProjectsOutcome::Added(project) => self.projects.push(project),
            ProjectsOutcome::Updated(update) => {
                replace_by_id(&mut self.projects, update.project);
                self.messages = update.messages;
            }
            ProjectsOutcome::Flagged(project) => {
                replace_by_id(&mut self.projects, project);
            }
            ProjectsOutcome::Members(accounts) => self.project_employees = accounts,
            ProjectsOutcome::Loaded(project) => self.selected_project = Some(project),
            ProjectsOutcome::RoleUpdated(project) => {
                self.selected_project = Some(project.clone());
                replace_by_id(&mut self.projects, project);
            }
        }
    }

    pub(crate) fn clear_selected(&mut self) {
        self.selected_project = None;
        self.messages.clear();
        self.detail.reset();
    }

    /// Projects not soft-deleted.
    pub fn active(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| !p.is_deleted)
    }
}
