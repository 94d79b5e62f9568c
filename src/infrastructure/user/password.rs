//! Password hashing utilities using Argon2

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use std::fmt::Debug;
use std::sync::Arc;

use crate::domain::DomainError;

/// Input hashed once to produce the decoy hash for unknown users
const DUMMY_PASSWORD: &str = "acorn-dummy-password-for-timing-equalization";

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a hash
    fn verify(&self, password: &str, hash: &str) -> bool;

    /// A valid hash of an unguessable value with the same cost as real
    /// hashes. Verifying against it takes as long as a real check.
    fn dummy_hash(&self) -> &str;
}

/// Argon2id hasher
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
    dummy: String,
}

impl Argon2Hasher {
    /// Create a hasher with the crate's default Argon2id parameters
    pub fn new() -> Result<Self, DomainError> {
        Self::from_params(Params::default())
    }

    /// Create a hasher with explicit cost parameters
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, DomainError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| DomainError::configuration(format!("Invalid Argon2 parameters: {}", e)))?;

        Self::from_params(params)
    }

    /// The decoy hash is computed up front; a hasher that cannot produce it
    /// is never handed out.
    fn from_params(params: Params) -> Result<Self, DomainError> {
        let mut hasher = Self {
            params,
            dummy: String::new(),
        };
        hasher.dummy = hasher.hash(DUMMY_PASSWORD)?;

        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        // Cost parameters are taken from the stored hash
        self.argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    fn dummy_hash(&self) -> &str {
        &self.dummy
    }
}

/// Hash on the blocking pool so slow hashing never stalls the runtime
pub async fn hash_password(
    hasher: Arc<dyn PasswordHasher>,
    password: String,
) -> Result<String, DomainError> {
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))?
}

/// Verify on the blocking pool.
///
/// With no stored hash the password is checked against the dummy hash and
/// the result is always `false`, so an unknown user costs the same as a
/// wrong password.
pub async fn verify_password(
    hasher: Arc<dyn PasswordHasher>,
    password: String,
    stored_hash: Option<String>,
) -> Result<bool, DomainError> {
    tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => hasher.verify(&password, &hash),
        None => {
            let _ = hasher.verify(&password, hasher.dummy_hash());
            false
        }
    })
    .await
    .map_err(|e| DomainError::internal(format!("Password verification task failed: {}", e)))
}

#[cfg(test)]
pub(crate) fn test_hasher() -> Argon2Hasher {
    Argon2Hasher::with_params(256, 1, 1).unwrap()
}
