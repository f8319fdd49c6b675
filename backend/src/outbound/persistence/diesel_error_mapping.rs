//! Translate Diesel and pool failures into store port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;
use crate::domain::ports::{StoreError, TransactionError};

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Map a Diesel failure to a store error, keeping the server message.
///
/// Unique violations keep the constraint name so callers can tell which
/// column clashed.
pub(crate) fn map_store_error(error: DieselError) -> StoreError {
    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    }
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreError::unique_violation(info.constraint_name().unwrap_or(info.message()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            StoreError::connection(info.message())
        }
        DieselError::DatabaseError(_, info) => StoreError::query(info.message()),
        other => StoreError::query(other.to_string()),
    }
}

pub(crate) fn map_begin_error(error: DieselError) -> TransactionError {
    TransactionError::begin(error.to_string())
}

pub(crate) fn map_commit_error(error: DieselError) -> TransactionError {
    TransactionError::commit(error.to_string())
}

pub(crate) fn map_rollback_error(error: DieselError) -> TransactionError {
    TransactionError::rollback(error.to_string())
}
