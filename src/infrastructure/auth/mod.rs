//! Authentication infrastructure module
//!
//! Token signing, the provider registry, the password provider and the
//! session service tying them together.

mod jwt;
mod password_provider;
mod registry;
mod session;

pub use jwt::{JwtConfig, JwtTokenService};
pub use password_provider::{PasswordAuthProvider, PASSWORD_METHOD};
pub use registry::ProviderRegistry;
pub use session::{LoginOutcome, SessionService};
