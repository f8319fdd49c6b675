//! Argon2id password hashing.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...`) with a fresh random salt
//! per call. Hashing is memory-hard, so it runs on the blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;

use crate::domain::PasswordHash;
use crate::domain::ports::{HashError, PasswordHasher};

/// Argon2id hasher with configurable cost parameters.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2Hasher {
    /// Hasher with explicit memory (KiB), iteration, and lane costs.
    ///
    /// # Errors
    ///
    /// Returns `HashError::Hash` when the parameters are out of range.
    pub fn with_costs(memory_kib: u32, iterations: u32, lanes: u32) -> Result<Self, HashError> {
        let params = Params::new(memory_kib, iterations, lanes, None)
            .map_err(|err| HashError::hash(err.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Whether `plaintext` matches the stored `hash`.
    ///
    /// # Errors
    ///
    /// Returns `HashError::Hash` when `hash` is not a PHC string.
    pub fn verify(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, HashError> {
        let parsed = PhcHash::new(hash.as_str()).map_err(|err| HashError::hash(err.to_string()))?;
        Ok(self
            .argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}

#[async_trait]
impl PasswordHasher for Argon2Hasher {
    async fn hash_password(&self, plaintext: &str) -> Result<PasswordHash, HashError> {
        let argon2 = self.argon2();
        let plaintext = plaintext.to_owned();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(plaintext.as_bytes(), &salt)
                .map(|hash| PasswordHash::new(hash.to_string()))
                .map_err(|err| HashError::hash(err.to_string()))
        })
        .await
        .map_err(|err| HashError::worker(err.to_string()))?
    }
}
