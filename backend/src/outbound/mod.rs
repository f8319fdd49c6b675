//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL transactions and stores using Diesel ORM
//! - **memory**: snapshot-isolated in-memory store used without a database
//! - **hashing**: Argon2id password hashing
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod hashing;
pub mod memory;
pub mod persistence;
