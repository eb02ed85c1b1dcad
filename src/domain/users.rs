//! User profile domain types
//!
//! Public profile information stored in the `users_public` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Marketplace role chosen at onboarding.
///
/// Stored values are the product's Spanish labels. Anything the database
/// returns that we don't recognize becomes `Unrecognized`, which the policy
/// engine treats as "no permissions".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    #[serde(rename = "Productor")]
    Producer,
    #[serde(rename = "Contratista")]
    Contractor,
    #[serde(rename = "Ambos")]
    Both,
    #[serde(other, rename = "unrecognized")]
    Unrecognized,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Producer => "Productor",
            Self::Contractor => "Contratista",
            Self::Both => "Ambos",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Productor" => Self::Producer,
            "Contratista" => Self::Contractor,
            "Ambos" => Self::Both,
            _ => Self::Unrecognized,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full public profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub role: Role,
    pub base_location: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    /// Server-maintained aggregate, authoritative
    pub reputation_avg: f64,
    pub reputation_count: i32,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Usuario")
    }
}

/// Compact profile embedded in listings (the joined counterpart)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub role: Role,
    pub base_location: Option<String>,
    pub phone: Option<String>,
    pub reputation_avg: f64,
}

impl UserSummary {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Usuario")
    }
}

impl From<&UserProfile> for UserSummary {
    fn from(p: &UserProfile) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            role: p.role,
            base_location: p.base_location.clone(),
            phone: p.phone.clone(),
            reputation_avg: p.reputation_avg,
        }
    }
}

/// Onboarding form
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OnboardingRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub base_location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Onboarding input that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub name: String,
    pub role: Role,
    pub base_location: String,
    pub phone: String,
}

impl OnboardingRequest {
    pub fn validate(self) -> Result<NewProfile, ApiError> {
        let name = required(self.name, "El nombre es obligatorio")?;
        let role = match self.role {
            Some(role) if role != Role::Unrecognized => role,
            _ => return Err(ApiError::validation("Elegí un rol")),
        };
        let base_location = required(self.base_location, "La ubicación es obligatoria")?;
        let phone = required(self.phone, "El teléfono es obligatorio")?;

        Ok(NewProfile {
            name,
            role,
            base_location,
            phone,
        })
    }
}

/// Profile edit form. `role` is intentionally absent: it is fixed at onboarding.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub base_location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub base_location: Option<String>,
    pub phone: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(self) -> Result<ProfileChanges, ApiError> {
        if self.role.is_some() {
            return Err(ApiError::validation("El rol no se puede cambiar"));
        }

        let name = optional_non_blank(self.name, "El nombre no puede estar vacío")?;
        let base_location = optional_non_blank(self.base_location, "La ubicación no puede estar vacía")?;
        let phone = optional_non_blank(self.phone, "El teléfono no puede estar vacío")?;

        Ok(ProfileChanges {
            name,
            base_location,
            phone,
        })
    }
}

pub(crate) fn required(value: Option<String>, msg: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(msg))
}

fn optional_non_blank(value: Option<String>, msg: &str) -> Result<Option<String>, ApiError> {
    match value {
        None => Ok(None),
        Some(v) => required(Some(v), msg).map(Some),
    }
}
