//! Token service and clock traits

use chrono::{DateTime, Duration, Utc};
use std::fmt::Debug;

use super::claims::{IssuedToken, TokenClaims};
use super::error::TokenError;
use crate::domain::user::Identity;
use crate::domain::DomainError;

/// Source of the current time for issuance and expiry checks
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for expiry tests
#[cfg(test)]
#[derive(Debug)]
pub struct FixedClock(std::sync::Mutex<DateTime<Utc>>);

#[cfg(test)]
impl FixedClock {
    pub fn at(timestamp: i64) -> Self {
        use chrono::TimeZone;
        Self(std::sync::Mutex::new(
            Utc.timestamp_opt(timestamp, 0).single().unwrap(),
        ))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Issues and verifies stateless session tokens.
///
/// There is no revocation list: a token stays valid until it expires.
pub trait TokenService: Send + Sync + Debug {
    /// Sign a token for `identity` valid for [`TokenService::ttl`]
    fn issue(&self, identity: &Identity) -> Result<IssuedToken, DomainError>;

    /// Check signature and expiry, returning the decoded claims
    fn decode(&self, token: &str) -> Result<TokenClaims, TokenError>;

    /// Check signature and expiry, returning only the subject username
    fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.decode(token).map(|claims| claims.sub)
    }

    /// Lifetime of issued tokens
    fn ttl(&self) -> Duration;
}
