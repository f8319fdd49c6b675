//! Driving port for admin registration use-cases.

use async_trait::async_trait;

use crate::domain::{Admin, AdminCreate, AdminFilter, AdminUpdate, Error, Page};

/// Admin CRUD operations. Each call runs in its own transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminService: Send + Sync {
    async fn create(&self, input: AdminCreate) -> Result<Admin, Error>;

    async fn find_by_id(&self, id: i64) -> Result<Admin, Error>;

    async fn find_many(&self, filter: AdminFilter) -> Result<Page<Admin>, Error>;

    async fn update(&self, id: i64, update: AdminUpdate) -> Result<Admin, Error>;

    async fn delete(&self, id: i64) -> Result<(), Error>;
}
