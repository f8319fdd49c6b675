//! Internal Diesel row structs for the registry tables.
//!
//! These types stay inside the persistence layer; stores convert them to
//! and from domain entities.

use diesel::prelude::*;

use super::schema::{admins, users};
use crate::domain::{Admin, PasswordHash, User};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub phone: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            surname: row.surname,
            email: row.email,
            password: PasswordHash::new(row.password),
            phone: row.phone,
        }
    }
}

/// Column values for inserting or overwriting a user. The id is never
/// written.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserValues<'a> {
    pub name: &'a str,
    pub surname: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub phone: i64,
}

impl<'a> From<&'a User> for UserValues<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: &user.name,
            surname: &user.surname,
            email: &user.email,
            password: user.password.as_str(),
            phone: user.phone,
        }
    }
}

/// Row struct for reading from the admins table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdminRow {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub active: bool,
}

impl From<AdminRow> for Admin {
    fn from(row: AdminRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            surname: row.surname,
            email: row.email,
            password: PasswordHash::new(row.password),
            active: row.active,
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = admins)]
pub(crate) struct AdminValues<'a> {
    pub name: &'a str,
    pub surname: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub active: bool,
}

impl<'a> From<&'a Admin> for AdminValues<'a> {
    fn from(admin: &'a Admin) -> Self {
        Self {
            name: &admin.name,
            surname: &admin.surname,
            email: &admin.email,
            password: admin.password.as_str(),
            active: admin.active,
        }
    }
}
