//! Transactional CRUD shared by every registrable entity.
//!
//! Users and admins differ only in a handful of fields. [`Registrant`]
//! captures those differences, [`RecordStore`] binds an entity to its store
//! port, and [`RegistrationService`] runs the transaction flow once for both.
//!
//! Every operation has an `*_in` form taking the caller's transaction, if
//! any. Passing `None` opens a fresh transaction; passing `Some` joins it,
//! leaving commit and rollback to the caller.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use super::credentials::{PasswordHash, PlainPassword};
use super::patch::Patch;
use super::ports::{PasswordHasher, StoreError, TransactionSource};
use super::registration_support::{ensure_unclaimed, hash_password, storage_failure};
use super::transaction::{Transaction, begin_transaction};
use super::{Error, Page};

/// An entity registered with an email and a password.
pub trait Registrant: Sized + Send + Sync + 'static {
    type Create: Send + 'static;
    type Update: Send + 'static;
    type Filter: Send + Sync + 'static;

    /// Lower-case singular noun used in storage failure messages.
    const SINGULAR: &'static str;
    /// Lower-case plural noun used in storage failure messages.
    const PLURAL: &'static str;
    /// Message returned when a lookup by id finds nothing.
    const NOT_FOUND: &'static str;

    fn id(&self) -> i64;

    fn email(&self) -> &str;

    fn assign_id(&mut self, id: i64);

    fn by_id(id: i64) -> Self::Filter;

    fn by_email(email: &str) -> Self::Filter;

    fn validate(&self) -> Result<(), Error>;

    /// The plaintext password carried by a create payload.
    fn create_password(input: &Self::Create) -> &PlainPassword;

    /// Build an unsaved entity from `input` and the hash of its password.
    fn from_create(input: Self::Create, password: PasswordHash) -> Self;

    /// Apply the plain fields of `update`, handing back the email and
    /// password patches, which need the store and the hasher.
    fn apply_update(&mut self, update: Self::Update) -> (Patch<String>, Patch<PlainPassword>);

    fn set_email(&mut self, email: String);

    fn set_password(&mut self, password: PasswordHash);
}

/// Statements on the table holding `R`, run on an open transaction.
#[async_trait]
pub trait RecordStore<R: Registrant>: Send {
    async fn insert(&mut self, record: &R) -> Result<i64, StoreError>;

    async fn find(&mut self, filter: &R::Filter) -> Result<Page<R>, StoreError>;

    async fn update(&mut self, record: &R) -> Result<(), StoreError>;

    async fn delete(&mut self, id: i64) -> Result<(), StoreError>;
}

/// Default registration service for `R` over a transactional store.
pub struct RegistrationService<S, R> {
    source: Arc<S>,
    hasher: Arc<dyn PasswordHasher>,
    entity: PhantomData<fn() -> R>,
}

impl<S, R> Clone for RegistrationService<S, R> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            hasher: Arc::clone(&self.hasher),
            entity: PhantomData,
        }
    }
}

impl<S, R> RegistrationService<S, R> {
    pub fn new(source: Arc<S>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            source,
            hasher,
            entity: PhantomData,
        }
    }
}

impl<S, R> RegistrationService<S, R>
where
    S: TransactionSource,
    S::Conn: RecordStore<R>,
    R: Registrant,
{
    /// Register `input` within `ambient`, or a new transaction.
    pub async fn create_in(
        &self,
        ambient: Option<&mut Transaction<'_, S::Conn>>,
        input: R::Create,
    ) -> Result<R, Error> {
        let mut tx = begin_transaction(self.source.as_ref(), ambient).await?;
        let result = self.create_with(tx.conn(), input).await;
        tx.finish(result).await
    }

    pub async fn find_by_id_in(
        &self,
        ambient: Option<&mut Transaction<'_, S::Conn>>,
        id: i64,
    ) -> Result<R, Error> {
        let mut tx = begin_transaction(self.source.as_ref(), ambient).await?;
        let result = fetch::<R, _>(tx.conn(), id).await;
        tx.release(result).await
    }

    pub async fn find_many_in(
        &self,
        ambient: Option<&mut Transaction<'_, S::Conn>>,
        filter: R::Filter,
    ) -> Result<Page<R>, Error> {
        let mut tx = begin_transaction(self.source.as_ref(), ambient).await?;
        let result = RecordStore::<R>::find(tx.conn(), &filter)
            .await
            .map_err(|err| storage_failure(&format!("Error querying {}", R::PLURAL), err));
        tx.release(result).await
    }

    /// Apply the set fields of `update` and persist the result.
    pub async fn update_in(
        &self,
        ambient: Option<&mut Transaction<'_, S::Conn>>,
        id: i64,
        update: R::Update,
    ) -> Result<R, Error> {
        let mut tx = begin_transaction(self.source.as_ref(), ambient).await?;
        let result = self.update_with(tx.conn(), id, update).await;
        tx.finish(result).await
    }

    pub async fn delete_in(
        &self,
        ambient: Option<&mut Transaction<'_, S::Conn>>,
        id: i64,
    ) -> Result<(), Error> {
        let mut tx = begin_transaction(self.source.as_ref(), ambient).await?;
        let result = delete_with::<R, _>(tx.conn(), id).await;
        tx.finish(result).await
    }

    async fn create_with(&self, conn: &mut S::Conn, input: R::Create) -> Result<R, Error> {
        let password = hash_password(self.hasher.as_ref(), R::create_password(&input)).await?;
        let mut record = R::from_create(input, password);
        record.validate()?;
        ensure_email_free::<R, _>(conn, record.email(), None).await?;
        let id = RecordStore::<R>::insert(conn, &record)
            .await
            .map_err(|err| storage_failure(&format!("Error creating {}", R::SINGULAR), err))?;
        record.assign_id(id);
        Ok(record)
    }

    async fn update_with(
        &self,
        conn: &mut S::Conn,
        id: i64,
        update: R::Update,
    ) -> Result<R, Error> {
        let mut record = fetch::<R, _>(conn, id).await?;
        let (email, password) = record.apply_update(update);
        if let Patch::Set(email) = email {
            ensure_email_free::<R, _>(conn, &email, Some(record.id())).await?;
            record.set_email(email);
        }
        if let Patch::Set(plain) = password {
            record.set_password(hash_password(self.hasher.as_ref(), &plain).await?);
        }

        record.validate()?;
        RecordStore::<R>::update(conn, &record)
            .await
            .map_err(|err| storage_failure(&format!("Error updating {}", R::SINGULAR), err))?;
        Ok(record)
    }
}

async fn fetch<R, C>(conn: &mut C, id: i64) -> Result<R, Error>
where
    R: Registrant,
    C: RecordStore<R>,
{
    RecordStore::<R>::find(conn, &R::by_id(id))
        .await
        .map_err(|err| storage_failure(&format!("Error querying {}", R::SINGULAR), err))?
        .into_first()
        .ok_or_else(|| Error::not_found(R::NOT_FOUND))
}

async fn ensure_email_free<R, C>(
    conn: &mut C,
    email: &str,
    owner: Option<i64>,
) -> Result<(), Error>
where
    R: Registrant,
    C: RecordStore<R>,
{
    let holders = RecordStore::<R>::find(conn, &R::by_email(email))
        .await
        .map_err(|err| storage_failure(&format!("Error querying {}", R::PLURAL), err))?;
    ensure_unclaimed(holders.items.iter().map(Registrant::id), owner)
}

async fn delete_with<R, C>(conn: &mut C, id: i64) -> Result<(), Error>
where
    R: Registrant,
    C: RecordStore<R>,
{
    let record = fetch::<R, _>(conn, id).await?;
    RecordStore::<R>::delete(conn, record.id())
        .await
        .map_err(|err| storage_failure(&format!("Error deleting {}", R::SINGULAR), err))
}
