//! Authentication provider trait

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::domain::user::Identity;
use crate::domain::DomainError;

/// Outcome of a credential check.
///
/// `Rejected` never says why: unknown user, inactive account and wrong
/// password all look the same to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Authenticated(Identity),
    Rejected,
}

impl AuthResult {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Rejected => None,
        }
    }

    pub fn into_identity(self) -> Option<Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Rejected => None,
        }
    }
}

/// A pluggable way of verifying credentials.
///
/// Each variant registers under its own method name; the registry and the
/// token service never need to know which concrete provider answered.
#[async_trait]
pub trait AuthProvider: Send + Sync + Debug {
    /// Method name this provider answers to (e.g. "password")
    fn name(&self) -> &str;

    /// Verify the given credentials.
    ///
    /// `Err` is reserved for infrastructure failures; bad credentials are
    /// `Ok(AuthResult::Rejected)`.
    async fn authenticate(&self, username: &str, password: &str)
    -> Result<AuthResult, DomainError>;
}

/// Constructor registered for a method name
pub type ProviderFactory = Arc<dyn Fn() -> Arc<dyn AuthProvider> + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_result_accessors() {
        let identity = Identity::new(1, "admin", None);
        let result = AuthResult::Authenticated(identity.clone());

        assert!(result.is_authenticated());
        assert_eq!(result.identity(), Some(&identity));
        assert_eq!(result.into_identity(), Some(identity));
    }

    #[test]
    fn test_rejected_has_no_identity() {
        let result = AuthResult::Rejected;

        assert!(!result.is_authenticated());
        assert!(result.identity().is_none());
        assert!(result.into_identity().is_none());
    }
}
