//! Port for user persistence, implemented on an open storage transaction.
use async_trait::async_trait;

use crate::domain::{Page, User, UserFilter};

use super::StoreError;

/// Statements on the `users` table.
///
/// Every method runs inside the transaction the connection represents; the
/// caller decides whether it commits.
#[async_trait]
pub trait UserStore: Send {
    /// Insert `user` and return the identifier assigned by storage. The
    /// `id` field of the argument is ignored.
    async fn insert_user(&mut self, user: &User) -> Result<i64, StoreError>;

    /// Users matching `filter`, newest first, with the total before
    /// pagination.
    async fn find_users(&mut self, filter: &UserFilter) -> Result<Page<User>, StoreError>;

    /// Overwrite every mutable column of the row identified by `user.id`.
    async fn update_user(&mut self, user: &User) -> Result<(), StoreError>;

    /// Remove the row with `id`. Deleting an absent row is not an error.
    async fn delete_user(&mut self, id: i64) -> Result<(), StoreError>;
}
