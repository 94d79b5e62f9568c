//! Username/password provider backed by the credential store

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::auth::{AuthProvider, AuthResult};
use crate::domain::user::CredentialStore;
use crate::domain::DomainError;
use crate::infrastructure::user::{verify_password, PasswordHasher};

/// Method name the password provider registers under
pub const PASSWORD_METHOD: &str = "password";

/// Checks a password against the stored Argon2 hash.
///
/// Unknown users are verified against the hasher's dummy hash and inactive
/// users against their own hash, so every rejection costs one full
/// verification.
#[derive(Clone)]
pub struct PasswordAuthProvider {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl PasswordAuthProvider {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Constructor suitable for [`ProviderRegistry::register`](super::ProviderRegistry::register)
    pub fn factory(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> impl Fn() -> Arc<dyn AuthProvider> + Send + Sync + 'static {
        move || -> Arc<dyn AuthProvider> { Arc::new(Self::new(store.clone(), hasher.clone())) }
    }
}

impl std::fmt::Debug for PasswordAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordAuthProvider")
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthProvider for PasswordAuthProvider {
    fn name(&self) -> &str {
        PASSWORD_METHOD
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthResult, DomainError> {
        let record = self.store.find_by_username(username).await?;

        let stored_hash = record.as_ref().map(|r| r.password_hash.clone());
        let matches = verify_password(self.hasher.clone(), password.to_string(), stored_hash).await?;

        let Some(record) = record else {
            tracing::debug!(username = %username, "Login rejected: unknown user");
            return Ok(AuthResult::Rejected);
        };

        if !record.is_active() {
            tracing::debug!(user_id = record.id, "Login rejected: account inactive");
            return Ok(AuthResult::Rejected);
        }

        if !matches {
            tracing::debug!(user_id = record.id, "Login rejected: password mismatch");
            return Ok(AuthResult::Rejected);
        }

        Ok(AuthResult::Authenticated(record.identity()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{MockCredentialStore, NewCredential};
    use crate::infrastructure::user::{test_hasher, Argon2Hasher, InMemoryCredentialStore};
    use std::sync::Mutex;

    /// Records the hash argument of every `verify` call
    #[derive(Debug)]
    struct RecordingHasher {
        inner: Argon2Hasher,
        verified: Mutex<Vec<String>>,
    }

    impl RecordingHasher {
        fn new() -> Self {
            Self {
                inner: test_hasher(),
                verified: Mutex::new(Vec::new()),
            }
        }

        fn verified(&self) -> Vec<String> {
            self.verified.lock().unwrap().clone()
        }
    }

    impl PasswordHasher for RecordingHasher {
        fn hash(&self, password: &str) -> Result<String, DomainError> {
            self.inner.hash(password)
        }

        fn verify(&self, password: &str, hash: &str) -> bool {
            self.verified.lock().unwrap().push(hash.to_string());
            self.inner.verify(password, hash)
        }

        fn dummy_hash(&self) -> &str {
            self.inner.dummy_hash()
        }
    }

    async fn create_recording_provider() -> (PasswordAuthProvider, Arc<RecordingHasher>, String, String) {
        let hasher = Arc::new(RecordingHasher::new());
        let store = InMemoryCredentialStore::new();

        let active_hash = hasher.hash("admin123").unwrap();
        let dormant_hash = hasher.hash("password123").unwrap();

        store
            .create(NewCredential {
                username: "admin".to_string(),
                email: None,
                password_hash: active_hash.clone(),
                active: true,
            })
            .await
            .unwrap();

        store
            .create(NewCredential {
                username: "dormant".to_string(),
                email: None,
                password_hash: dormant_hash.clone(),
                active: false,
            })
            .await
            .unwrap();

        let provider = PasswordAuthProvider::new(Arc::new(store), hasher.clone());
        (provider, hasher, active_hash, dormant_hash)
    }

    async fn create_provider() -> PasswordAuthProvider {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(test_hasher());
        let store = InMemoryCredentialStore::new();

        store
            .create(NewCredential {
                username: "admin".to_string(),
                email: Some("admin@acorn.local".to_string()),
                password_hash: hasher.hash("admin123").unwrap(),
                active: true,
            })
            .await
            .unwrap();

        store
            .create(NewCredential {
                username: "dormant".to_string(),
                email: None,
                password_hash: hasher.hash("password123").unwrap(),
                active: false,
            })
            .await
            .unwrap();

        PasswordAuthProvider::new(Arc::new(store), hasher)
    }

    #[tokio::test]
    async fn test_correct_password() {
        let provider = create_provider().await;

        let result = provider.authenticate("admin", "admin123").await.unwrap();

        let identity = result.into_identity().unwrap();
        assert_eq!(identity.username, "admin");
        assert_eq!(identity.email.as_deref(), Some("admin@acorn.local"));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let provider = create_provider().await;

        let result = provider.authenticate("admin", "wrong").await.unwrap();
        assert_eq!(result, AuthResult::Rejected);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let provider = create_provider().await;

        let result = provider.authenticate("ghost", "admin123").await.unwrap();
        assert_eq!(result, AuthResult::Rejected);
    }

    #[tokio::test]
    async fn test_inactive_user_rejected_even_with_correct_password() {
        let provider = create_provider().await;

        let result = provider.authenticate("dormant", "password123").await.unwrap();
        assert_eq!(result, AuthResult::Rejected);

        let result = provider.authenticate("dormant", "wrong").await.unwrap();
        assert_eq!(result, AuthResult::Rejected);
    }

    #[tokio::test]
    async fn test_username_is_case_sensitive() {
        let provider = create_provider().await;

        let result = provider.authenticate("Admin", "admin123").await.unwrap();
        assert_eq!(result, AuthResult::Rejected);
    }

    #[tokio::test]
    async fn test_store_failure_is_error() {
        let mut store = MockCredentialStore::new();
        store
            .expect_find_by_username()
            .returning(|_| Err(DomainError::storage("connection refused")));

        let provider = PasswordAuthProvider::new(Arc::new(store), Arc::new(test_hasher()));

        let result = provider.authenticate("admin", "admin123").await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_unknown_user_verifies_against_dummy_hash() {
        let (provider, hasher, _, _) = create_recording_provider().await;

        let result = provider.authenticate("ghost", "admin123").await.unwrap();

        assert_eq!(result, AuthResult::Rejected);
        assert_eq!(hasher.verified(), vec![hasher.dummy_hash().to_string()]);
    }

    #[tokio::test]
    async fn test_inactive_user_verifies_against_own_hash() {
        let (provider, hasher, _, dormant_hash) = create_recording_provider().await;

        let result = provider.authenticate("dormant", "password123").await.unwrap();

        assert_eq!(result, AuthResult::Rejected);
        assert_eq!(hasher.verified(), vec![dormant_hash]);
    }

    #[tokio::test]
    async fn test_wrong_password_verifies_once() {
        let (provider, hasher, active_hash, _) = create_recording_provider().await;

        let result = provider.authenticate("admin", "wrong").await.unwrap();

        assert_eq!(result, AuthResult::Rejected);
        assert_eq!(hasher.verified(), vec![active_hash]);
    }

    #[tokio::test]
    async fn test_name() {
        let provider = create_provider().await;
        assert_eq!(provider.name(), "password");
    }
}
