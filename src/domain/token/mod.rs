//! Session token domain

mod claims;
mod error;
mod service;

pub use claims::{IssuedToken, TokenClaims};
pub use error::TokenError;
pub use service::{Clock, SystemClock, TokenService};

#[cfg(test)]
pub use service::FixedClock;
