//! # Request Payloads
//!
//! Partial records sent on create and update. Every field is optional and
//! absent fields are left out of the request body, so an update only touches
//! what the caller set.
//!
//! Patches also deserialize with `deny_unknown_fields`, which lets callers
//! build them from user-supplied JSON and get a typo reported instead of a
//! silently ignored field.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::entities::EntityId;
use crate::errors::PayloadError;

/// A partial record.
pub trait Patch: Serialize + DeserializeOwned {
    /// Noun of the record this patch targets.
    const NOUN: &'static str;

    /// True when no field is set.
    fn is_empty(&self) -> bool;

    /// Parse a patch from JSON text.
    fn from_json(raw: &str) -> Result<Self, PayloadError> {
        serde_json::from_str(raw).map_err(|e| PayloadError::Malformed {
            noun: Self::NOUN,
            reason: e.to_string(),
        })
    }

    /// Parse a patch for an update, which must set at least one field.
    fn from_json_non_empty(raw: &str) -> Result<Self, PayloadError> {
        let patch = Self::from_json(raw)?;
        if patch.is_empty() {
            return Err(PayloadError::Empty { noun: Self::NOUN });
        }
        Ok(patch)
    }
}

/// Account create/update body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AccountPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Patch for AccountPatch {
    const NOUN: &'static str = "account";

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Skill entry inside an employee patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmployeeSkillPatch {
    pub skill_id: EntityId,
    #[serde(default)]
    pub years_of_experience: f64,
}

/// Employee create/update body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmployeePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citizen_identity_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<EmployeeSkillPatch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Patch for EmployeePatch {
    const NOUN: &'static str = "employee";

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Position create/update body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PositionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Patch for PositionPatch {
    const NOUN: &'static str = "position";

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Skill create/update body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SkillPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Patch for SkillPatch {
    const NOUN: &'static str = "skill";

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Member entry inside a project patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmployeeRolePatch {
    pub account_id: EntityId,
    #[serde(default)]
    pub role: String,
}

/// Project create/update body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<EntityId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_manager: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<Vec<EmployeeRolePatch>>,
}

impl Patch for ProjectPatch {
    const NOUN: &'static str = "project";

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Body of `PATCH /projects/:id/employee/role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub account_id: EntityId,
    pub role: String,
}

/// Body of `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /accounts/reset-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}
