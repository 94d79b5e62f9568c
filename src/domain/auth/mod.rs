//! Authentication domain
//!
//! The provider capability, its result type and the error taxonomy shared
//! by the registry and session handlers.

mod error;
mod provider;

pub use error::AuthError;
pub use provider::{AuthProvider, AuthResult, ProviderFactory};
