//! Port for admin persistence, implemented on an open storage transaction.
use async_trait::async_trait;

use crate::domain::{Admin, AdminFilter, Page};

use super::StoreError;

/// Statements on the `admins` table.
#[async_trait]
pub trait AdminStore: Send {
    /// Insert `admin` and return the identifier assigned by storage.
    async fn insert_admin(&mut self, admin: &Admin) -> Result<i64, StoreError>;

    /// Admins matching `filter`, newest first, with the total before
    /// pagination.
    async fn find_admins(&mut self, filter: &AdminFilter) -> Result<Page<Admin>, StoreError>;

    /// Overwrite every mutable column of the row identified by `admin.id`.
    async fn update_admin(&mut self, admin: &Admin) -> Result<(), StoreError>;

    async fn delete_admin(&mut self, id: i64) -> Result<(), StoreError>;
}
