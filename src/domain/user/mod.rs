//! User domain
//!
//! Identity and credential record types, the credential store trait and
//! validation for new records.

mod entity;
mod repository;
mod validation;

pub use entity::{CredentialRecord, Identity, NewCredential};
pub use repository::CredentialStore;
pub use validation::{validate_email, validate_password, validate_username, UserValidationError};

#[cfg(test)]
pub use repository::MockCredentialStore;
