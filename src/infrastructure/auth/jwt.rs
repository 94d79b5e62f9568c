//! JWT session token issuance and verification

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt::Debug;
use std::sync::Arc;

use crate::domain::token::{Clock, IssuedToken, SystemClock, TokenClaims, TokenError, TokenService};
use crate::domain::user::Identity;
use crate::domain::DomainError;

/// Configuration for the JWT token service
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime in seconds
    pub ttl_seconds: u64,
}

impl JwtConfig {
    /// Create new JWT configuration
    pub fn new(secret: impl Into<String>, ttl_seconds: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds,
        }
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

/// HS256 token service with a single process-wide secret
#[derive(Clone)]
pub struct JwtTokenService {
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("ttl_seconds", &self.ttl.num_seconds())
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtTokenService {
    /// Create a token service reading the wall clock
    pub fn new(config: JwtConfig) -> Result<Self, DomainError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a token service with an explicit time source
    pub fn with_clock(config: JwtConfig, clock: Arc<dyn Clock>) -> Result<Self, DomainError> {
        if config.secret.is_empty() {
            return Err(DomainError::configuration("JWT secret must not be empty"));
        }

        let ttl_seconds = i64::try_from(config.ttl_seconds)
            .map_err(|_| DomainError::configuration("Token TTL is too large"))?;

        if ttl_seconds <= 0 {
            return Err(DomainError::configuration(
                "Token TTL must be at least one second",
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against `clock` with zero leeway in `decode`
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            ttl: Duration::seconds(ttl_seconds),
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            clock,
        })
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, identity: &Identity) -> Result<IssuedToken, DomainError> {
        let issued_at = self.clock.now();
        let claims = TokenClaims::new(identity.username.clone(), issued_at, self.ttl);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at: issued_at + self.ttl,
        })
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify_error(e.kind()))?;

        let claims = token_data.claims;

        if claims.is_expired_at(self.clock.now()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

fn classify_error(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::FixedClock;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    const NOW: i64 = 1_700_000_000;

    fn create_test_identity() -> Identity {
        Identity::new(1, "admin", Some("admin@acorn.local".to_string()))
    }

    fn create_service(ttl_seconds: u64) -> (JwtTokenService, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::at(NOW));
        let service = JwtTokenService::with_clock(
            JwtConfig::new("test-secret-key-12345", ttl_seconds),
            clock.clone(),
        )
        .unwrap();
        (service, clock)
    }

    fn flip_signature_byte(token: &str, index: usize) -> String {
        let (signing_input, signature) = token.rsplit_once('.').unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();
        bytes[index] ^= 0x01;
        format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(bytes))
    }

    #[test]
    fn test_issue_and_verify() {
        let (service, _) = create_service(3600);

        let issued = service.issue(&create_test_identity()).unwrap();
        assert!(!issued.token.is_empty());

        let subject = service.verify(&issued.token).unwrap();
        assert_eq!(subject, "admin");
    }

    #[test]
    fn test_issued_claims_window() {
        let (service, clock) = create_service(3600);

        let issued = service.issue(&create_test_identity()).unwrap();
        let claims = service.decode(&issued.token).unwrap();

        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.iat, NOW);
        assert_eq!(claims.exp, NOW + 3600);
        assert!(issued.expires_at > clock.now());
        assert_eq!(issued.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn test_expired_at_boundary() {
        let (service, clock) = create_service(1);

        let issued = service.issue(&create_test_identity()).unwrap();
        assert_eq!(service.verify(&issued.token).unwrap(), "admin");

        clock.advance(Duration::seconds(1));
        assert_eq!(service.verify(&issued.token), Err(TokenError::Expired));

        clock.advance(Duration::hours(5));
        assert_eq!(service.verify(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn test_valid_just_before_expiry() {
        let (service, clock) = create_service(60);

        let issued = service.issue(&create_test_identity()).unwrap();

        clock.advance(Duration::seconds(59));
        assert!(service.verify(&issued.token).is_ok());
    }

    #[test]
    fn test_tampered_signature_bytes() {
        let (service, _) = create_service(3600);
        let issued = service.issue(&create_test_identity()).unwrap();

        let signature = issued.token.rsplit_once('.').unwrap().1;
        let length = URL_SAFE_NO_PAD.decode(signature).unwrap().len();
        assert_eq!(length, 32);

        for index in 0..length {
            let tampered = flip_signature_byte(&issued.token, index);
            assert_eq!(
                service.verify(&tampered),
                Err(TokenError::InvalidSignature),
                "flipping signature byte {} was accepted",
                index
            );
        }
    }

    #[test]
    fn test_tampered_payload() {
        let (service, _) = create_service(3600);
        let issued = service.issue(&create_test_identity()).unwrap();

        let mut parts: Vec<&str> = issued.token.split('.').collect();
        let forged_payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"root","iat":1700000000,"exp":1900000000}"#);
        parts[1] = &forged_payload;

        assert_eq!(
            service.verify(&parts.join(".")),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_wrong_secret() {
        let clock = Arc::new(FixedClock::at(NOW));
        let service1 =
            JwtTokenService::with_clock(JwtConfig::new("secret-1", 3600), clock.clone()).unwrap();
        let service2 =
            JwtTokenService::with_clock(JwtConfig::new("secret-2", 3600), clock).unwrap();

        let issued = service1.issue(&create_test_identity()).unwrap();

        assert_eq!(
            service2.verify(&issued.token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_malformed_tokens() {
        let (service, _) = create_service(3600);

        assert_eq!(service.verify("invalid-token"), Err(TokenError::Malformed));
        assert_eq!(service.verify(""), Err(TokenError::Malformed));
        assert_eq!(service.verify("a.b"), Err(TokenError::Malformed));
        assert_eq!(service.verify("%%%.%%%.%%%"), Err(TokenError::Malformed));
    }

    #[test]
    fn test_token_missing_claims_is_malformed() {
        let (service, _) = create_service(3600);

        #[derive(serde::Serialize)]
        struct SubjectOnly {
            sub: String,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &SubjectOnly {
                sub: "admin".to_string(),
            },
            &EncodingKey::from_secret(b"test-secret-key-12345"),
        )
        .unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let result = JwtTokenService::new(JwtConfig::new("secret", 0));
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = JwtTokenService::new(JwtConfig::new("", 3600));
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_ttl() {
        let (service, _) = create_service(7200);
        assert_eq!(service.ttl(), Duration::seconds(7200));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = JwtConfig::new("super-secret-value", 3600);
        assert!(!format!("{:?}", config).contains("super-secret-value"));

        let service = JwtTokenService::new(config).unwrap();
        assert!(!format!("{:?}", service).contains("super-secret-value"));
    }
}
