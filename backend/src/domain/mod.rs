//! Domain primitives, services, and ports.
//!
//! Purpose: define the registry's entities (users and admins), the
//! classified error they fail with, and the transactional CRUD services that
//! inbound adapters drive. Infrastructure is reached only through the traits
//! in [`ports`].
//!
//! Public surface:
//! - `Error` / `ErrorKind` / `Severity`: classified failures and their log
//!   severity.
//! - `Patch`: set-or-unset field for partial updates.
//! - `Transaction` / `begin_transaction`: transaction handles with nesting.
//! - `User`, `Admin` and their create/update/filter payloads.
//! - `RegistrationService`: the transactional CRUD flow shared by users and
//!   admins, which plug in through `Registrant` and `RecordStore`.
//! - `UserServiceImpl`, `AdminServiceImpl`: the service instantiated for each
//!   entity.

pub mod error;
pub mod ports;
pub mod trace_id;

mod admin;
mod admin_service;
mod credentials;
mod pagination;
mod patch;
mod registration_service;
mod registration_support;
mod transaction;
mod user;
mod user_service;
mod validation;

pub use self::admin::{Admin, AdminCreate, AdminFilter, AdminUpdate};
pub use self::admin_service::AdminServiceImpl;
pub use self::credentials::{PasswordHash, PlainPassword};
pub use self::error::{ALL_ERROR_KINDS, CANCELLATION_MARKERS, Error, ErrorKind, Origin, Severity};
pub use self::pagination::{Page, page_window};
pub use self::patch::Patch;
pub use self::registration_service::{RecordStore, Registrant, RegistrationService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::transaction::{Transaction, begin_transaction};
pub use self::user::{User, UserCreate, UserFilter, UserUpdate};
pub use self::user_service::UserServiceImpl;
pub use self::validation::is_valid_mailbox;
