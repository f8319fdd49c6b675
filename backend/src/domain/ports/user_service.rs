//! Driving port for user registration use-cases.
//!
//! Inbound adapters depend on this trait only, so handler tests can swap in
//! `MockUserService` instead of wiring storage.

use async_trait::async_trait;

use crate::domain::{Error, Page, User, UserCreate, UserFilter, UserUpdate};

/// User CRUD operations. Each call runs in its own transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a user and return it with its storage-assigned id.
    async fn create(&self, input: UserCreate) -> Result<User, Error>;

    /// Fetch one user; `not_found` when absent.
    async fn find_by_id(&self, id: i64) -> Result<User, Error>;

    /// Filtered, paginated listing.
    async fn find_many(&self, filter: UserFilter) -> Result<Page<User>, Error>;

    /// Apply the set fields of `update` to the user with `id`.
    async fn update(&self, id: i64, update: UserUpdate) -> Result<User, Error>;

    async fn delete(&self, id: i64) -> Result<(), Error>;
}
