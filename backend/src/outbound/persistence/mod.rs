//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Implements the transaction and store ports over PostgreSQL via
//! `diesel-async` with `bb8` pooling.
//!
//! - **Thin adapters**: stores only translate between Diesel rows and domain
//!   entities. Uniqueness checks and validation live in the services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **One connection per transaction**: `DieselTransactionSource::begin`
//!   checks out a connection and holds it until commit or rollback.
//!
//! # Example
//!
//! ```ignore
//! use registry::outbound::persistence::{DbPool, DieselTransactionSource, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/registry")).await?;
//! let source = DieselTransactionSource::new(pool, Arc::new(DefaultClock));
//! ```

mod diesel_admin_store;
mod diesel_error_mapping;
mod diesel_transaction;
mod diesel_user_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_transaction::{DieselTransaction, DieselTransactionSource};
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, OwnedConnection, PoolConfig, PoolError};
