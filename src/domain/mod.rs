//! Domain layer - identities, credentials, providers and tokens

pub mod auth;
pub mod error;
pub mod token;
pub mod user;

pub use auth::{AuthError, AuthProvider, AuthResult};
pub use error::DomainError;
pub use token::{IssuedToken, TokenClaims, TokenError, TokenService};
pub use user::{CredentialRecord, CredentialStore, Identity, NewCredential};
