//! Session token claims

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Wire claims of a session token: exactly `sub`, `iat` and `exp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (username)
    pub sub: String,
    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,
}

impl TokenClaims {
    /// Create claims for `subject` issued at `issued_at` and valid for `ttl`
    pub fn new(subject: impl Into<String>, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        let exp = issued_at + ttl;

        Self {
            sub: subject.into(),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Check expiry against an explicit instant. Valid only while `now < exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// A freshly signed token together with its expiry
#[derive(Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"[hidden]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn test_claims_window() {
        let claims = TokenClaims::new("admin", at(1_000), Duration::seconds(3600));

        assert_eq!(claims.subject(), "admin");
        assert_eq!(claims.iat, 1_000);
        assert_eq!(claims.exp, 4_600);
        assert_eq!(claims.expires_at(), Some(at(4_600)));
    }

    #[test]
    fn test_expiry_boundary() {
        let claims = TokenClaims::new("admin", at(1_000), Duration::seconds(1));

        assert!(!claims.is_expired_at(at(1_000)));
        assert!(claims.is_expired_at(at(1_001)));
        assert!(claims.is_expired_at(at(5_000)));
    }

    #[test]
    fn test_claims_wire_shape() {
        let claims = TokenClaims::new("admin", at(10), Duration::seconds(5));

        let value = serde_json::to_value(&claims).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert_eq!(object["sub"], "admin");
        assert_eq!(object["iat"], 10);
        assert_eq!(object["exp"], 15);
    }

    #[test]
    fn test_issued_token_debug_hides_token() {
        let issued = IssuedToken {
            token: "eyJhbGciOiJIUzI1NiJ9.payload.sig".to_string(),
            expires_at: at(10),
        };

        assert!(!format!("{:?}", issued).contains("eyJ"));
    }
}
