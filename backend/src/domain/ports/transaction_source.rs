//! Storage driver port: opening, committing, and rolling back transactions.
//!
//! The connection type returned by [`TransactionSource::begin`] is the handle
//! entity stores run their statements on. The domain wraps it in a
//! [`crate::domain::Transaction`], which owns the nesting rule.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::define_port_error;

define_port_error! {
    /// Driver-level transaction failures.
    pub enum TransactionError {
        /// A transaction could not be opened.
        Begin { message: String } => "{message}",
        /// Commit was rejected.
        Commit { message: String } => "{message}",
        /// Rollback failed.
        Rollback { message: String } => "{message}",
    }
}

/// An open storage transaction.
///
/// Implementations must make `rollback` a no-op once `commit` has succeeded,
/// and must discard uncommitted work when dropped without either call.
#[async_trait]
pub trait StorageTransaction: Send {
    async fn commit(&mut self) -> Result<(), TransactionError>;

    async fn rollback(&mut self) -> Result<(), TransactionError>;
}

/// Factory for storage transactions plus the storage clock.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Connection type statements run on while the transaction is open.
    type Conn: StorageTransaction;

    /// Open a new transaction. Blocks while the pool is exhausted.
    async fn begin(&self) -> Result<Self::Conn, TransactionError>;

    /// Current time according to the storage clock.
    fn now(&self) -> DateTime<Utc>;
}
