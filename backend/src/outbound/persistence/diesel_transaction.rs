//! PostgreSQL transaction driver.
//!
//! Each transaction checks out its own pooled connection and issues `BEGIN`
//! on it. A transaction dropped while still open returns its connection to
//! the pool mid-transaction; the pool manager sees the open transaction and
//! discards the connection instead of reusing it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, TransactionManager};
use mockable::Clock;

use super::diesel_error_mapping::{
    map_begin_error, map_commit_error, map_rollback_error, pool_error_message,
};
use super::pool::{DbPool, OwnedConnection};
use crate::domain::ports::{StorageTransaction, TransactionError, TransactionSource};

/// Opens PostgreSQL transactions on pooled connections.
#[derive(Clone)]
pub struct DieselTransactionSource {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselTransactionSource {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl TransactionSource for DieselTransactionSource {
    type Conn = DieselTransaction;

    async fn begin(&self) -> Result<DieselTransaction, TransactionError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| TransactionError::begin(pool_error_message(err)))?;
        AnsiTransactionManager::begin_transaction(&mut *conn)
            .await
            .map_err(map_begin_error)?;
        Ok(DieselTransaction { conn, open: true })
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

/// An open PostgreSQL transaction.
pub struct DieselTransaction {
    conn: OwnedConnection,
    open: bool,
}

impl DieselTransaction {
    /// Connection for statements inside the transaction.
    pub(crate) fn connection(&mut self) -> &mut AsyncPgConnection {
        &mut self.conn
    }
}

#[async_trait]
impl StorageTransaction for DieselTransaction {
    async fn commit(&mut self) -> Result<(), TransactionError> {
        if !self.open {
            return Err(TransactionError::commit("transaction already finished"));
        }
        AnsiTransactionManager::commit_transaction(&mut *self.conn)
            .await
            .map_err(map_commit_error)?;
        self.open = false;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), TransactionError> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        AnsiTransactionManager::rollback_transaction(&mut *self.conn)
            .await
            .map_err(map_rollback_error)
    }
}
