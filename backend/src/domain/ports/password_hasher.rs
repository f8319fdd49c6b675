//! Port for one-way password hashing.
use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum HashError {
        /// The hashing primitive rejected its input or parameters.
        Hash { message: String } => "password hashing failed: {message}",
        /// The worker running the hash did not complete.
        Worker { message: String } => "password hashing worker failed: {message}",
    }
}

/// Produces a storable hash from a plaintext password.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash_password(&self, plaintext: &str) -> Result<PasswordHash, HashError>;
}
