//! In-memory transactional store.
//!
//! Serves the user and admin ports when no database is configured, and backs
//! service tests. Transactions are serialized: `begin` waits until no other
//! transaction is open, then works on a snapshot of the tables. `commit`
//! publishes the snapshot, `rollback` or drop discards it. Because nothing
//! else commits while a snapshot is open, publishing it cannot lose another
//! transaction's rows, reuse an id, or slip past the email check.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use tokio::sync::{Mutex as Gate, OwnedMutexGuard};

use crate::domain::ports::{
    AdminStore, StorageTransaction, StoreError, TransactionError, TransactionSource, UserStore,
};
use crate::domain::{Admin, AdminFilter, Page, User, UserFilter, page_window};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    admins: BTreeMap<i64, Admin>,
    user_seq: i64,
    admin_seq: i64,
}

#[derive(Debug, Default)]
struct Shared {
    tables: Tables,
    stats: StoreStats,
    fail_begin: Option<String>,
    fail_statement: Option<String>,
    fail_commit: Option<String>,
}

/// Transaction counters, for asserting on commit/rollback behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub begins: usize,
    pub commits: usize,
    pub rollbacks: usize,
}

/// Shared handle to the in-memory tables. Cloning shares the data.
#[derive(Clone)]
pub struct InMemoryStore {
    shared: Arc<Mutex<Shared>>,
    gate: Arc<Gate<()>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            shared: Arc::default(),
            gate: Arc::default(),
            clock,
        }
    }

    pub fn stats(&self) -> StoreStats {
        self.lock().stats
    }

    /// Committed users, oldest first.
    pub fn users(&self) -> Vec<User> {
        self.lock().tables.users.values().cloned().collect()
    }

    /// Committed admins, oldest first.
    pub fn admins(&self) -> Vec<Admin> {
        self.lock().tables.admins.values().cloned().collect()
    }

    /// Make the next `begin` fail with `message`.
    pub fn fail_next_begin(&self, message: impl Into<String>) {
        self.lock().fail_begin = Some(message.into());
    }

    /// Make the next statement on any open transaction fail with `message`.
    pub fn fail_next_statement(&self, message: impl Into<String>) {
        self.lock().fail_statement = Some(message.into());
    }

    /// Make the next commit fail with `message`.
    pub fn fail_next_commit(&self, message: impl Into<String>) {
        self.lock().fail_commit = Some(message.into());
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        lock(&self.shared)
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl TransactionSource for InMemoryStore {
    type Conn = InMemoryTransaction;

    async fn begin(&self) -> Result<InMemoryTransaction, TransactionError> {
        if let Some(message) = self.lock().fail_begin.take() {
            return Err(TransactionError::begin(message));
        }
        let turn = Arc::clone(&self.gate).lock_owned().await;
        let mut shared = self.lock();
        shared.stats.begins += 1;
        Ok(InMemoryTransaction {
            shared: Arc::clone(&self.shared),
            working: shared.tables.clone(),
            turn: Some(turn),
        })
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

/// Open transaction over a private snapshot of the tables. Holds the store's
/// turn until committed, rolled back, or dropped.
pub struct InMemoryTransaction {
    shared: Arc<Mutex<Shared>>,
    working: Tables,
    turn: Option<OwnedMutexGuard<()>>,
}

impl InMemoryTransaction {
    fn is_finished(&self) -> bool {
        self.turn.is_none()
    }

    fn check_statement(&self) -> Result<(), StoreError> {
        if self.is_finished() {
            return Err(StoreError::connection("transaction already finished"));
        }
        match lock(&self.shared).fail_statement.take() {
            Some(message) => Err(StoreError::query(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StorageTransaction for InMemoryTransaction {
    async fn commit(&mut self) -> Result<(), TransactionError> {
        if self.is_finished() {
            return Err(TransactionError::commit("transaction already finished"));
        }
        let mut shared = lock(&self.shared);
        if let Some(message) = shared.fail_commit.take() {
            return Err(TransactionError::commit(message));
        }
        shared.tables = std::mem::take(&mut self.working);
        shared.stats.commits += 1;
        drop(shared);
        self.turn = None;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), TransactionError> {
        if self.is_finished() {
            return Ok(());
        }
        lock(&self.shared).stats.rollbacks += 1;
        self.working = Tables::default();
        self.turn = None;
        Ok(())
    }
}

/// Apply the window and report the count the way `COUNT(*) OVER()` would:
/// the matching total, or zero when the window selects no rows.
fn paginate<T: Clone>(matching: Vec<&T>, page: i64, limit: i64) -> Page<T> {
    let total = i64::try_from(matching.len()).unwrap_or(i64::MAX);
    let window: Vec<T> = match page_window(page, limit) {
        None => matching.into_iter().cloned().collect(),
        Some((limit, offset)) => matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect(),
    };
    if window.is_empty() {
        return Page::empty();
    }
    Page::new(window, total)
}

fn email_taken<'a>(
    mut emails: impl Iterator<Item = (&'a i64, &'a str)>,
    email: &str,
    id: i64,
) -> bool {
    emails.any(|(other, taken)| *other != id && taken == email)
}

#[async_trait]
impl UserStore for InMemoryTransaction {
    async fn insert_user(&mut self, user: &User) -> Result<i64, StoreError> {
        self.check_statement()?;
        let emails = self.working.users.iter().map(|(id, u)| (id, u.email.as_str()));
        if email_taken(emails, &user.email, 0) {
            return Err(StoreError::unique_violation("users_email_key"));
        }
        self.working.user_seq += 1;
        let id = self.working.user_seq;
        self.working.users.insert(id, User { id, ..user.clone() });
        Ok(id)
    }

    async fn find_users(&mut self, filter: &UserFilter) -> Result<Page<User>, StoreError> {
        self.check_statement()?;
        let matching = self
            .working
            .users
            .values()
            .rev()
            .filter(|user| filter.id.is_none_or(|id| user.id == id))
            .filter(|user| filter.email.as_deref().is_none_or(|email| user.email == email))
            .collect();
        Ok(paginate(matching, filter.page, filter.limit))
    }

    async fn update_user(&mut self, user: &User) -> Result<(), StoreError> {
        self.check_statement()?;
        let emails = self.working.users.iter().map(|(id, u)| (id, u.email.as_str()));
        if email_taken(emails, &user.email, user.id) {
            return Err(StoreError::unique_violation("users_email_key"));
        }
        if let Some(row) = self.working.users.get_mut(&user.id) {
            *row = user.clone();
        }
        Ok(())
    }

    async fn delete_user(&mut self, id: i64) -> Result<(), StoreError> {
        self.check_statement()?;
        self.working.users.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl AdminStore for InMemoryTransaction {
    async fn insert_admin(&mut self, admin: &Admin) -> Result<i64, StoreError> {
        self.check_statement()?;
        let emails = self.working.admins.iter().map(|(id, a)| (id, a.email.as_str()));
        if email_taken(emails, &admin.email, 0) {
            return Err(StoreError::unique_violation("admins_email_key"));
        }
        self.working.admin_seq += 1;
        let id = self.working.admin_seq;
        self.working.admins.insert(id, Admin { id, ..admin.clone() });
        Ok(id)
    }

    async fn find_admins(&mut self, filter: &AdminFilter) -> Result<Page<Admin>, StoreError> {
        self.check_statement()?;
        let matching = self
            .working
            .admins
            .values()
            .rev()
            .filter(|admin| filter.id.is_none_or(|id| admin.id == id))
            .filter(|admin| filter.email.as_deref().is_none_or(|email| admin.email == email))
            .collect();
        Ok(paginate(matching, filter.page, filter.limit))
    }

    async fn update_admin(&mut self, admin: &Admin) -> Result<(), StoreError> {
        self.check_statement()?;
        let emails = self.working.admins.iter().map(|(id, a)| (id, a.email.as_str()));
        if email_taken(emails, &admin.email, admin.id) {
            return Err(StoreError::unique_violation("admins_email_key"));
        }
        if let Some(row) = self.working.admins.get_mut(&admin.id) {
            *row = admin.clone();
        }
        Ok(())
    }

    async fn delete_admin(&mut self, id: i64) -> Result<(), StoreError> {
        self.check_statement()?;
        self.working.admins.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
