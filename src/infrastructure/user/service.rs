//! User service for creating credential records

use std::sync::Arc;

use crate::domain::user::{
    validate_email, validate_password, validate_username, CredentialRecord, CredentialStore,
    NewCredential,
};
use crate::domain::DomainError;

use super::password::{hash_password, PasswordHasher};

/// Request for creating a new user
#[derive(Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub active: bool,
}

impl CreateUserRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: None,
            password: password.into(),
            active: true,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[hidden]")
            .field("active", &self.active)
            .finish()
    }
}

/// Creates users, hashing their passwords before they reach the store
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

impl UserService {
    /// Create a new user service
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<CredentialRecord, DomainError> {
        validate_username(&request.username).map_err(|e| DomainError::validation(e.to_string()))?;

        if let Some(email) = request.email.as_deref() {
            validate_email(email).map_err(|e| DomainError::validation(e.to_string()))?;
        }

        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.store.find_by_username(&request.username).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                request.username
            )));
        }

        let password_hash = hash_password(self.hasher.clone(), request.password).await?;

        let record = self
            .store
            .create(NewCredential {
                username: request.username,
                email: request.email,
                password_hash,
                active: request.active,
            })
            .await?;

        tracing::info!(user_id = record.id, username = %record.username, "Created user");

        Ok(record)
    }

    /// Count stored users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.store.count().await
    }
}
