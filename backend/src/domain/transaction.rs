//! Transaction handles and the nesting rule.
//!
//! A service operation either opens a transaction or joins the one its
//! caller already holds. Joined handles share the connection and the
//! timestamp of the outer scope, and their `commit`/`rollback` do nothing:
//! only the outermost handle talks to storage.

use chrono::{DateTime, SubsecRound, Utc};
use tracing::warn;

use super::ports::{StorageTransaction, TransactionSource};
use super::Error;

enum Handle<'a, C> {
    Owned(C),
    Joined(&'a mut C),
}

/// A storage transaction as seen by service code.
///
/// Consumed by [`Transaction::commit`] and [`Transaction::rollback`], so a
/// handle cannot be finished twice. An owned handle dropped without either
/// call leaves the driver to discard the uncommitted work.
pub struct Transaction<'a, C> {
    conn: Handle<'a, C>,
    now: DateTime<Utc>,
}

impl<C> std::fmt::Debug for Transaction<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("nested", &self.is_nested())
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

impl<'a, C> Transaction<'a, C> {
    /// Wrap a freshly opened storage transaction.
    pub fn owned(conn: C, now: DateTime<Utc>) -> Self {
        Self {
            conn: Handle::Owned(conn),
            now,
        }
    }

    /// Connection to run statements on.
    pub fn conn(&mut self) -> &mut C {
        match &mut self.conn {
            Handle::Owned(conn) => conn,
            Handle::Joined(conn) => conn,
        }
    }

    /// Timestamp fixed when the outermost transaction began, truncated to
    /// whole seconds.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Whether this handle defers to an outer transaction.
    pub fn is_nested(&self) -> bool {
        matches!(self.conn, Handle::Joined(_))
    }

    /// A nested handle over the same connection.
    pub fn join(&mut self) -> Transaction<'_, C> {
        let now = self.now;
        Transaction {
            conn: Handle::Joined(self.conn()),
            now,
        }
    }
}

impl<C> Transaction<'_, C>
where
    C: StorageTransaction,
{
    /// Commit the transaction. A nested handle does nothing.
    pub async fn commit(self) -> Result<(), Error> {
        match self.conn {
            Handle::Joined(_) => Ok(()),
            Handle::Owned(mut conn) => conn
                .commit()
                .await
                .map_err(|err| Error::internal(format!("Error committing transaction: {err}"))),
        }
    }

    /// Roll the transaction back. A nested handle does nothing.
    pub async fn rollback(self) -> Result<(), Error> {
        match self.conn {
            Handle::Joined(_) => Ok(()),
            Handle::Owned(mut conn) => conn.rollback().await.map_err(|err| {
                Error::internal(format!("Error rolling back transaction: {err}"))
            }),
        }
    }

    /// Commit when `result` is `Ok`, roll back otherwise.
    ///
    /// The original failure is returned even when the rollback itself fails;
    /// the rollback failure is logged.
    pub async fn finish<T>(self, result: Result<T, Error>) -> Result<T, Error> {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(err) => {
                self.rollback_quietly().await;
                Err(err)
            }
        }
    }

    /// Roll back whatever the outcome. Used by read-only operations.
    pub async fn release<T>(self, result: Result<T, Error>) -> Result<T, Error> {
        self.rollback_quietly().await;
        result
    }

    async fn rollback_quietly(self) {
        if let Err(err) = self.rollback().await {
            warn!(
                code = %err.kind(),
                origin = %err.origin(),
                error = err.message(),
                "transaction rollback failed"
            );
        }
    }
}

/// Open a transaction, or join `ambient` when the caller already holds one.
///
/// # Examples
/// ```ignore
/// let mut outer = begin_transaction(&source, None).await?;
/// let inner = begin_transaction(&source, Some(&mut outer)).await?;
/// assert!(inner.is_nested());
/// inner.commit().await?; // no-op
/// outer.commit().await?; // real commit
/// ```
pub async fn begin_transaction<'a, S>(
    source: &S,
    ambient: Option<&'a mut Transaction<'_, S::Conn>>,
) -> Result<Transaction<'a, S::Conn>, Error>
where
    S: TransactionSource,
{
    if let Some(outer) = ambient {
        return Ok(outer.join());
    }
    let conn = source
        .begin()
        .await
        .map_err(|err| Error::internal(format!("Error creating transaction: {err}")))?;
    Ok(Transaction::owned(conn, source.now().trunc_subsecs(0)))
}
