//! User registration use-cases: [`Registrant`] for [`User`] plus the
//! [`UserService`] port over the shared registration flow.

use async_trait::async_trait;

use super::credentials::{PasswordHash, PlainPassword};
use super::patch::Patch;
use super::ports::{StoreError, TransactionSource, UserService, UserStore};
use super::registration_service::{RecordStore, Registrant, RegistrationService};
use super::{Error, Page, User, UserCreate, UserFilter, UserUpdate};

/// Default [`UserService`] over a transactional store.
pub type UserServiceImpl<S> = RegistrationService<S, User>;

impl Registrant for User {
    type Create = UserCreate;
    type Update = UserUpdate;
    type Filter = UserFilter;

    const SINGULAR: &'static str = "user";
    const PLURAL: &'static str = "users";
    const NOT_FOUND: &'static str = "User not found";

    fn id(&self) -> i64 {
        self.id
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn by_id(id: i64) -> UserFilter {
        UserFilter::by_id(id)
    }

    fn by_email(email: &str) -> UserFilter {
        UserFilter::by_email(email)
    }

    fn validate(&self) -> Result<(), Error> {
        User::validate(self)
    }

    fn create_password(input: &UserCreate) -> &PlainPassword {
        &input.password
    }

    fn from_create(input: UserCreate, password: PasswordHash) -> Self {
        Self {
            id: 0,
            name: input.name,
            surname: input.surname,
            email: input.email,
            password,
            phone: input.phone,
        }
    }

    fn apply_update(&mut self, update: UserUpdate) -> (Patch<String>, Patch<PlainPassword>) {
        let UserUpdate {
            name,
            surname,
            email,
            password,
            phone,
        } = update;
        name.apply(&mut self.name);
        surname.apply(&mut self.surname);
        phone.apply(&mut self.phone);
        (email, password)
    }

    fn set_email(&mut self, email: String) {
        self.email = email;
    }

    fn set_password(&mut self, password: PasswordHash) {
        self.password = password;
    }
}

#[async_trait]
impl<C: UserStore> RecordStore<User> for C {
    async fn insert(&mut self, record: &User) -> Result<i64, StoreError> {
        self.insert_user(record).await
    }

    async fn find(&mut self, filter: &UserFilter) -> Result<Page<User>, StoreError> {
        self.find_users(filter).await
    }

    async fn update(&mut self, record: &User) -> Result<(), StoreError> {
        self.update_user(record).await
    }

    async fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        self.delete_user(id).await
    }
}

#[async_trait]
impl<S> UserService for UserServiceImpl<S>
where
    S: TransactionSource + 'static,
    S::Conn: UserStore,
{
    async fn create(&self, input: UserCreate) -> Result<User, Error> {
        self.create_in(None, input).await
    }

    async fn find_by_id(&self, id: i64) -> Result<User, Error> {
        self.find_by_id_in(None, id).await
    }

    async fn find_many(&self, filter: UserFilter) -> Result<Page<User>, Error> {
        self.find_many_in(None, filter).await
    }

    async fn update(&self, id: i64, update: UserUpdate) -> Result<User, Error> {
        self.update_in(None, id, update).await
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        self.delete_in(None, id).await
    }
}
