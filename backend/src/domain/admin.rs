//! Admin data model and its request shapes.

use serde::{Deserialize, Serialize};

use super::credentials::{PasswordHash, PlainPassword};
use super::patch::Patch;
use super::validation::{email, required};
use super::Error;

/// A back-office administrator.
///
/// Same invariants as [`crate::domain::User`] minus the phone; uniqueness
/// of `email` is scoped to admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admin {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: PasswordHash,
    pub active: bool,
}

impl Admin {
    pub fn validate(&self) -> Result<(), Error> {
        required(&self.name, "Name is required")?;
        required(&self.surname, "Surname is required")?;
        email(&self.email, "Email is invalid")?;
        required(self.password.as_str(), "Password is required")
    }
}

/// Payload for registering an admin. New admins start active.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminCreate {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: PlainPassword,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminUpdate {
    pub name: Patch<String>,
    pub surname: Patch<String>,
    pub email: Patch<String>,
    pub password: Patch<PlainPassword>,
    pub active: Patch<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdminFilter {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub page: i64,
    pub limit: i64,
}

impl AdminFilter {
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }
}
