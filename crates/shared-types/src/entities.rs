//! # Core Domain Entities
//!
//! Records exchanged with the StaffDesk backend.
//!
//! ## Clusters
//!
//! - **People**: `Account`, `Employee`, `EmployeeSkill`
//! - **Catalogue**: `Position`, `Skill`
//! - **Work**: `Project`, `EmployeeRole`, `ProjectMessage`
//! - **Auth**: `LoginResponse`, `PasswordResetResponse`
//!
//! The backend joins foreign keys server-side and may send either the bare
//! identifier or the populated record, so every relationship is a [`Ref`].
//! Every field except `_id` defaults when missing from the payload or sent
//! as `null`.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use std::fmt;

use crate::errors::EntityIdError;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Server-assigned record identifier (`_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Parse an identifier, rejecting blank input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, EntityIdError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EntityIdError::Empty);
        }
        if trimmed.contains('/') {
            return Err(EntityIdError::InvalidCharacter { id: raw, found: '/' });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for EntityId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// A foreign-key reference: either the bare id or the joined record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    /// Unpopulated reference.
    Id(EntityId),
    /// Reference populated by the server.
    Populated(Box<T>),
}

impl<T: Entity> Ref<T> {
    /// Identifier of the referenced record, whichever form it arrived in.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        match self {
            Ref::Id(id) => id,
            Ref::Populated(record) => record.id(),
        }
    }

    /// The joined record, if the server populated it.
    #[must_use]
    pub fn populated(&self) -> Option<&T> {
        match self {
            Ref::Id(_) => None,
            Ref::Populated(record) => Some(record),
        }
    }
}

impl<T> From<T> for Ref<T> {
    fn from(record: T) -> Self {
        Ref::Populated(Box::new(record))
    }
}

/// A record that carries a server identifier.
pub trait Entity {
    /// Singular, lowercase noun used in messages ("account", "skill", ...).
    const NOUN: &'static str;

    /// The record identifier.
    fn id(&self) -> &EntityId;
}

// =============================================================================
// PEOPLE
// =============================================================================

/// Login account attached to an employee.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde(default, rename = "employeeId")]
    pub employee: Option<Ref<Employee>>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub email: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub password: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub role: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub status: String,
}

impl Entity for Account {
    const NOUN: &'static str = "account";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// A skill held by an employee.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSkill {
    #[serde(default, rename = "skillId")]
    pub skill: Option<Ref<Skill>>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub years_of_experience: f64,
}

/// Employee record.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub phone_number: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub date_of_birth: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub avatar: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub citizen_identity_card: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub gender: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub status: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub projects: Vec<Ref<Project>>,
    #[serde(default)]
    pub position: Option<Ref<Position>>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub description: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub skills: Vec<EmployeeSkill>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub has_account: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub email: String,
}

impl Entity for Employee {
    const NOUN: &'static str = "employee";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

// =============================================================================
// CATALOGUE
// =============================================================================

/// Job position.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub description: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub status: String,
}

impl Entity for Position {
    const NOUN: &'static str = "position";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Technical skill or programming language.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub category: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub status: String,
}

impl Entity for Skill {
    const NOUN: &'static str = "skill";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

// =============================================================================
// WORK
// =============================================================================

/// Project member and the role they hold on the project.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRole {
    #[serde(default, rename = "accountId")]
    pub account: Option<Ref<Account>>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub role: String,
}

/// Project record. Deletion is soft: `is_deleted` flips and the record stays.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: EntityId,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub description: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub technologies: Vec<Ref<Skill>>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub start_date: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub end_date: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub project_manager: Option<Ref<Account>>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub employees: Vec<EmployeeRole>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub is_deleted: bool,
}

impl Entity for Project {
    const NOUN: &'static str = "project";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Membership change notice returned by a project update.
///
/// `message` is the change kind (`"add"` or `"remove"`), not display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMessage {
    pub email: String,
    pub project_name: String,
    pub message: String,
}

/// Body of a successful project update.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub project: Project,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub messages: Vec<ProjectMessage>,
}

// =============================================================================
// AUTH
// =============================================================================

/// Body of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Body of a password reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetResponse {
    #[serde(default)]
    pub new_password: Option<String>,
}
