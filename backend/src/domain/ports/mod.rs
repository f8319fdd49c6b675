//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`TransactionSource`, `UserStore`, `AdminStore`,
//! `PasswordHasher`) describe what the services need from storage and
//! hashing. Driving ports (`UserService`, `AdminService`) are what inbound
//! adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_service;
mod admin_store;
mod password_hasher;
mod store_error;
mod transaction_source;
mod user_service;
mod user_store;

#[cfg(test)]
pub use admin_service::MockAdminService;
pub use admin_service::AdminService;
pub use admin_store::AdminStore;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{HashError, PasswordHasher};
pub use store_error::StoreError;
pub use transaction_source::{StorageTransaction, TransactionError, TransactionSource};
#[cfg(test)]
pub use user_service::MockUserService;
pub use user_service::UserService;
pub use user_store::UserStore;
