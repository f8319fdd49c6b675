//! User data model and its request shapes.

use serde::{Deserialize, Serialize};

use super::credentials::{PasswordHash, PlainPassword};
use super::patch::Patch;
use super::validation::{email, required};
use super::Error;

/// A registered user.
///
/// ## Invariants
/// - `id` is assigned by storage and never changes.
/// - `email` is a valid mailbox, unique among users.
/// - `phone` is non-zero.
///
/// The password hash is never serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: PasswordHash,
    pub phone: i64,
}

impl User {
    /// Check the entity, reporting the first broken field.
    ///
    /// # Examples
    /// ```
    /// use registry::domain::{PasswordHash, User};
    ///
    /// let user = User {
    ///     id: 0,
    ///     name: "Ada".into(),
    ///     surname: "Lovelace".into(),
    ///     email: "ada@example.com".into(),
    ///     password: PasswordHash::new("hash"),
    ///     phone: 0,
    /// };
    /// let err = user.validate().expect_err("phone missing");
    /// assert_eq!(err.message(), "Phone is required");
    /// ```
    pub fn validate(&self) -> Result<(), Error> {
        required(&self.name, "Name is required")?;
        required(&self.surname, "Surname is required")?;
        email(&self.email, "Email is invalid")?;
        required(self.password.as_str(), "Password is required")?;
        if self.phone == 0 {
            return Err(Error::invalid("Phone is required"));
        }
        Ok(())
    }
}

/// Payload for registering a user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserCreate {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: PlainPassword,
    pub phone: i64,
}

/// Partial update; only set fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserUpdate {
    pub name: Patch<String>,
    pub surname: Patch<String>,
    pub email: Patch<String>,
    pub password: Patch<PlainPassword>,
    pub phone: Patch<i64>,
}

/// Selection for listing users. Unset predicates match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserFilter {
    pub id: Option<i64>,
    pub email: Option<String>,
    /// One-based page number.
    pub page: i64,
    /// Page size; zero or less returns every row.
    pub limit: i64,
}

impl UserFilter {
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
