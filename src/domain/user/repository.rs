//! Credential store trait

use async_trait::async_trait;

use super::entity::{CredentialRecord, NewCredential};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistence boundary for user credential records.
///
/// Usernames are unique and matched exactly (case-sensitive).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a record by exact username
    async fn find_by_username(&self, username: &str)
    -> Result<Option<CredentialRecord>, DomainError>;

    /// Number of stored records
    async fn count(&self) -> Result<usize, DomainError>;

    /// Persist a new record, assigning its id
    async fn create(&self, credential: NewCredential) -> Result<CredentialRecord, DomainError>;
}
