//! In-memory credential store implementation

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::user::{CredentialRecord, CredentialStore, NewCredential};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Inner {
    /// Records keyed by exact username
    records: HashMap<String, CredentialRecord>,
    last_id: i64,
}

/// In-memory implementation of CredentialStore
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Inner>,
}

impl InMemoryCredentialStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial records, assigning ids in order
    pub fn with_records(records: Vec<NewCredential>) -> Result<Self, DomainError> {
        let mut inner = Inner::default();

        for credential in records {
            insert(&mut inner, credential)?;
        }

        Ok(Self {
            inner: RwLock::new(inner),
        })
    }
}

fn insert(inner: &mut Inner, credential: NewCredential) -> Result<CredentialRecord, DomainError> {
    if inner.records.contains_key(&credential.username) {
        return Err(DomainError::conflict(format!(
            "Username '{}' already exists",
            credential.username
        )));
    }

    if let Some(email) = credential.email.as_deref() {
        if inner
            .records
            .values()
            .any(|r| r.email.as_deref() == Some(email))
        {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                email
            )));
        }
    }

    inner.last_id += 1;
    let record = credential.into_record(inner.last_id);
    inner
        .records
        .insert(record.username.clone(), record.clone());

    Ok(record)
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(username).cloned())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.records.len())
    }

    async fn create(&self, credential: NewCredential) -> Result<CredentialRecord, DomainError> {
        let mut inner = self.inner.write().await;
        insert(&mut inner, credential)
    }
}
