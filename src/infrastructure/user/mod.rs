//! User infrastructure module
//!
//! Password hashing with Argon2, the in-memory and PostgreSQL credential
//! stores, and the service that creates users.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{hash_password, verify_password, Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresCredentialStore;
pub use repository::InMemoryCredentialStore;
pub use service::{CreateUserRequest, UserService};

#[cfg(test)]
pub(crate) use password::test_hasher;
