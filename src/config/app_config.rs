use serde::Deserialize;

use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Token signing and provider selection
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing key; falls back to `JWT_SECRET`, then a random key
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
    #[serde(default = "default_method")]
    pub default_method: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[hidden]"))
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("default_method", &self.default_method)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Clone, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Falls back to `DATABASE_URL`
    #[serde(default)]
    pub database_url: Option<String>,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Connection strings usually embed a password
        f.debug_struct("StorageConfig")
            .field("backend", &self.backend)
            .field("database_url", &self.database_url.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

/// First-run admin account
#[derive(Clone, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    /// Generated and logged once when absent
    #[serde(default)]
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("enabled", &self.enabled)
            .field("admin_username", &self.admin_username)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_token_ttl_seconds() -> u64 {
    3600
}

fn default_method() -> String {
    "password".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:3001".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_email() -> String {
    "admin@acorn.local".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_seconds: default_token_ttl_seconds(),
            default_method: default_method(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            admin_username: default_admin_username(),
            admin_email: default_admin_email(),
            admin_password: None,
        }
    }
}

impl AppConfig {
    /// Layer `config/default`, `config/local` and `ACORN__*` environment
    /// variables, in increasing precedence
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("ACORN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl AuthConfig {
    /// Configured secret, then `JWT_SECRET`; `None` when neither is set
    pub fn resolve_secret(&self) -> Option<String> {
        self.jwt_secret
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()))
    }
}

impl StorageConfig {
    /// Configured URL, then `DATABASE_URL`
    pub fn resolve_database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.auth.token_ttl_seconds, 3600);
        assert_eq!(config.auth.default_method, "password");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.cors.allowed_origins.len(), 2);
        assert!(config.bootstrap.enabled);
        assert_eq!(config.bootstrap.admin_username, "admin");
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "server": {"port": 9000},
                "auth": {"token_ttl_seconds": 60},
                "storage": {"backend": "postgres"},
                "logging": {"format": "json"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.token_ttl_seconds, 60);
        assert_eq!(config.auth.default_method, "password");
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AppConfig {
            auth: AuthConfig {
                jwt_secret: Some("very-secret-signing-key".to_string()),
                ..AuthConfig::default()
            },
            storage: StorageConfig {
                backend: StorageBackend::Postgres,
                database_url: Some("postgres://acorn:hunter2@db/acorn".to_string()),
            },
            bootstrap: BootstrapConfig {
                admin_password: Some("admin123".to_string()),
                ..BootstrapConfig::default()
            },
            ..AppConfig::default()
        };

        let debug = format!("{:?}", config);
        assert!(!debug.contains("very-secret-signing-key"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("admin123"));
    }

    #[test]
    fn test_configured_secret_wins() {
        let auth = AuthConfig {
            jwt_secret: Some("configured".to_string()),
            ..AuthConfig::default()
        };

        assert_eq!(auth.resolve_secret().as_deref(), Some("configured"));
    }
}
