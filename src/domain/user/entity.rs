//! Identity and credential record types

use serde::{Deserialize, Serialize};

/// Verified identity produced by a successful authentication.
///
/// Carries no secret material and is safe to serialize into responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub active: bool,
}

impl Identity {
    pub fn new(id: i64, username: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email,
            active: true,
        }
    }
}

impl From<&CredentialRecord> for Identity {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            email: record.email.clone(),
            active: record.active,
        }
    }
}

/// Stored user record, owned by the credential store.
///
/// Deliberately not `Serialize`; the hash only leaves the store through
/// a provider's verification step.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub active: bool,
}

impl CredentialRecord {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn identity(&self) -> Identity {
        Identity::from(self)
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"[hidden]")
            .field("active", &self.active)
            .finish()
    }
}

/// Input for creating a credential record
#[derive(Clone)]
pub struct NewCredential {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub active: bool,
}

impl std::fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewCredential")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"[hidden]")
            .field("active", &self.active)
            .finish()
    }
}

impl NewCredential {
    /// Attach a store-assigned id
    pub fn into_record(self, id: i64) -> CredentialRecord {
        CredentialRecord {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            active: self.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_record() -> CredentialRecord {
        CredentialRecord {
            id: 7,
            username: "admin".to_string(),
            email: Some("admin@acorn.local".to_string()),
            password_hash: "$argon2id$v=19$secret-hash".to_string(),
            active: true,
        }
    }

    #[test]
    fn test_identity_from_record() {
        let record = create_test_record();
        let identity = record.identity();

        assert_eq!(identity.id, 7);
        assert_eq!(identity.username, "admin");
        assert_eq!(identity.email.as_deref(), Some("admin@acorn.local"));
        assert!(identity.active);
    }

    #[test]
    fn test_identity_serialization_has_no_hash() {
        let identity = create_test_record().identity();

        let json = serde_json::to_string(&identity).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_identity_without_email_skips_field() {
        let identity = Identity::new(1, "bob", None);

        let json = serde_json::to_string(&identity).unwrap();
        assert!(!json.contains("email"));
    }

    #[test]
    fn test_record_debug_hides_hash() {
        let record = create_test_record();

        let debug = format!("{:?}", record);
        assert!(debug.contains("[hidden]"));
        assert!(!debug.contains("secret-hash"));
    }

    #[test]
    fn test_new_credential_into_record() {
        let new = NewCredential {
            username: "carol".to_string(),
            email: None,
            password_hash: "hash".to_string(),
            active: false,
        };

        let record = new.into_record(3);
        assert_eq!(record.id, 3);
        assert_eq!(record.username, "carol");
        assert!(!record.is_active());
    }
}
