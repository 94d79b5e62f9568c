//! Session service: login and token verification

use std::sync::Arc;

use crate::domain::auth::{AuthError, AuthResult};
use crate::domain::token::{IssuedToken, TokenService};
use crate::domain::user::{CredentialStore, Identity};
use crate::infrastructure::observability::{record_login_attempt, record_token_verification};

use super::registry::ProviderRegistry;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub identity: Identity,
    pub issued: IssuedToken,
}

/// Resolves a provider, checks credentials and issues tokens.
///
/// Shared by all request handlers; every field is read-only after startup.
#[derive(Clone)]
pub struct SessionService {
    registry: Arc<ProviderRegistry>,
    token_service: Arc<dyn TokenService>,
    store: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("registry", &self.registry)
            .field("token_service", &self.token_service)
            .finish_non_exhaustive()
    }
}

impl SessionService {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        token_service: Arc<dyn TokenService>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            registry,
            token_service,
            store,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Authenticate with the requested method (or the default) and issue
    /// a token for the verified identity
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        method: Option<&str>,
    ) -> Result<LoginOutcome, AuthError> {
        let method_label = match method {
            Some(m) if !m.is_empty() => m,
            _ => self.registry.default_method(),
        };

        if username.is_empty() || password.is_empty() {
            record_login_attempt(method_label, "invalid");
            return Err(AuthError::validation("Username and password are required"));
        }

        let provider = self.registry.resolve(method).inspect_err(|_| {
            record_login_attempt(method_label, "unknown_method");
        })?;

        let result = provider.authenticate(username, password).await.map_err(|e| {
            record_login_attempt(method_label, "error");
            AuthError::from(e)
        })?;

        let identity = match result {
            AuthResult::Authenticated(identity) => identity,
            AuthResult::Rejected => {
                record_login_attempt(method_label, "rejected");
                tracing::info!(method = %provider.name(), "Login rejected");
                return Err(AuthError::Rejected);
            }
        };

        let issued = self.token_service.issue(&identity).map_err(|e| {
            record_login_attempt(method_label, "error");
            AuthError::from(e)
        })?;

        record_login_attempt(method_label, "success");
        tracing::info!(
            user_id = identity.id,
            username = %identity.username,
            method = %provider.name(),
            "Login succeeded"
        );

        Ok(LoginOutcome { identity, issued })
    }

    /// Verify a bearer token, returning its subject username
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        match self.token_service.verify(token) {
            Ok(subject) => {
                record_token_verification("valid");
                Ok(subject)
            }
            Err(e) => {
                record_token_verification(e.as_str());
                tracing::debug!(reason = e.as_str(), "Token rejected");
                Err(AuthError::Token(e))
            }
        }
    }

    /// Verify a token and re-resolve the full identity from the store.
    ///
    /// A subject whose record is gone or inactive is treated as rejected.
    pub async fn current_identity(&self, token: &str) -> Result<Identity, AuthError> {
        let subject = self.verify(token)?;

        match self.store.find_by_username(&subject).await? {
            Some(record) if record.is_active() => Ok(record.identity()),
            _ => {
                tracing::info!(username = %subject, "Token subject no longer active");
                Err(AuthError::Rejected)
            }
        }
    }
}
