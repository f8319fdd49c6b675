//! Admin registration use-cases. Admins start active and carry an `active`
//! flag in place of the phone number.

use async_trait::async_trait;

use super::credentials::{PasswordHash, PlainPassword};
use super::patch::Patch;
use super::ports::{AdminService, AdminStore, StoreError, TransactionSource};
use super::registration_service::{RecordStore, Registrant, RegistrationService};
use super::{Admin, AdminCreate, AdminFilter, AdminUpdate, Error, Page};

/// Default [`AdminService`] over a transactional store.
pub type AdminServiceImpl<S> = RegistrationService<S, Admin>;

impl Registrant for Admin {
    type Create = AdminCreate;
    type Update = AdminUpdate;
    type Filter = AdminFilter;

    const SINGULAR: &'static str = "admin";
    const PLURAL: &'static str = "admins";
    const NOT_FOUND: &'static str = "Admin not found";

    fn id(&self) -> i64 {
        self.id
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn by_id(id: i64) -> AdminFilter {
        AdminFilter::by_id(id)
    }

    fn by_email(email: &str) -> AdminFilter {
        AdminFilter::by_email(email)
    }

    fn validate(&self) -> Result<(), Error> {
        Admin::validate(self)
    }

    fn create_password(input: &AdminCreate) -> &PlainPassword {
        &input.password
    }

    fn from_create(input: AdminCreate, password: PasswordHash) -> Self {
        Self {
            id: 0,
            name: input.name,
            surname: input.surname,
            email: input.email,
            password,
            active: true,
        }
    }

    fn apply_update(&mut self, update: AdminUpdate) -> (Patch<String>, Patch<PlainPassword>) {
        let AdminUpdate {
            name,
            surname,
            email,
            password,
            active,
        } = update;
        name.apply(&mut self.name);
        surname.apply(&mut self.surname);
        active.apply(&mut self.active);
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
impl<C: AdminStore> RecordStore<Admin> for C {
    async fn insert(&mut self, record: &Admin) -> Result<i64, StoreError> {
        self.insert_admin(record).await
    }

    async fn find(&mut self, filter: &AdminFilter) -> Result<Page<Admin>, StoreError> {
        self.find_admins(filter).await
    }

    async fn update(&mut self, record: &Admin) -> Result<(), StoreError> {
        self.update_admin(record).await
    }

    async fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        self.delete_admin(id).await
    }
}

#[async_trait]
impl<S> AdminService for AdminServiceImpl<S>
where
    S: TransactionSource + 'static,
    S::Conn: AdminStore,
{
    async fn create(&self, input: AdminCreate) -> Result<Admin, Error> {
        self.create_in(None, input).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Admin, Error> {
        self.find_by_id_in(None, id).await
    }

    async fn find_many(&self, filter: AdminFilter) -> Result<Page<Admin>, Error> {
        self.find_many_in(None, filter).await
    }

    async fn update(&self, id: i64, update: AdminUpdate) -> Result<Admin, Error> {
        self.update_in(None, id, update).await
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        self.delete_in(None, id).await
    }
}
