//! Acorn authentication service
//!
//! Pluggable credential providers behind a method registry, with HS256
//! session tokens issued on successful login.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use api::state::AppState;
use config::{AppConfig, AuthConfig, BootstrapConfig, StorageBackend, StorageConfig};
use domain::token::TokenService;
use domain::user::CredentialStore;
use infrastructure::{
    auth::{JwtConfig, JwtTokenService, PasswordAuthProvider, ProviderRegistry, SessionService, PASSWORD_METHOD},
    user::{
        Argon2Hasher, CreateUserRequest, InMemoryCredentialStore, PasswordHasher,
        PostgresCredentialStore, UserService,
    },
};
use rand::Rng;
use tracing::{info, warn};

/// Create the application state with all services initialized
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new()?);
    let store = create_credential_store(&config.storage).await?;

    if config.bootstrap.enabled {
        create_initial_admin_user(&config.bootstrap, store.clone(), hasher.clone()).await?;
    }

    let token_service = create_token_service(&config.auth)?;

    build_app_state(&config.auth, store, hasher, token_service)
}

/// Wire the registry, token service and store into handler state.
///
/// The registry is fully populated here and frozen behind an `Arc`.
pub fn build_app_state(
    auth: &AuthConfig,
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    token_service: Arc<dyn TokenService>,
) -> anyhow::Result<AppState> {
    let registry = build_registry(&auth.default_method, store.clone(), hasher);

    if !registry.contains(registry.default_method()) {
        anyhow::bail!(
            "Default authentication method '{}' is not registered. Available methods: {}",
            registry.default_method(),
            registry.available_methods().join(", ")
        );
    }

    let session = SessionService::new(Arc::new(registry), token_service, store.clone());

    Ok(AppState::new(Arc::new(session), store))
}

/// Register every built-in provider
pub fn build_registry(
    default_method: &str,
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new(default_method);
    registry.register(PASSWORD_METHOD, PasswordAuthProvider::factory(store, hasher));
    registry
}

async fn create_credential_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn CredentialStore>> {
    info!("Storage backend: {:?}", config.backend);

    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryCredentialStore::new())),
        StorageBackend::Postgres => {
            let database_url = config.resolve_database_url().ok_or_else(|| {
                anyhow::anyhow!("DATABASE_URL is required for the postgres storage backend")
            })?;

            info!("Connecting to PostgreSQL...");
            let store = PostgresCredentialStore::connect(&database_url).await?;
            info!("PostgreSQL connection established");

            Ok(Arc::new(store))
        }
    }
}

/// Create the token service from the configured secret, `JWT_SECRET`, or a
/// random key
fn create_token_service(config: &AuthConfig) -> anyhow::Result<Arc<dyn TokenService>> {
    let secret = config.resolve_secret().unwrap_or_else(|| {
        warn!(
            "No JWT secret configured. Generating random secret. \
             Tokens will NOT survive a restart. \
             Set ACORN__AUTH__JWT_SECRET or JWT_SECRET for persistent sessions."
        );
        generate_random_secret()
    });

    let service = JwtTokenService::new(JwtConfig::new(secret, config.token_ttl_seconds))?;
    info!(ttl_seconds = config.token_ttl_seconds, "Token service initialized");

    Ok(Arc::new(service))
}

/// Generate a random JWT secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Generate a random password for the initial admin user
fn generate_random_password() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// The generated admin password goes straight to the terminal, never through
/// the tracing pipeline.
fn write_generated_password_notice(
    out: &mut dyn std::io::Write,
    username: &str,
    password: &str,
) -> std::io::Result<()> {
    use std::io::Write;

    writeln!(out, "===========================================")?;
    writeln!(out, "Initial admin user created")?;
    writeln!(out, "Username: {}", username)?;
    writeln!(out, "Password: {}", password)?;
    writeln!(out, "Please change this password after first login.")?;
    writeln!(out, "===========================================")
}

/// Create an initial admin user if no users exist
pub async fn create_initial_admin_user(
    config: &BootstrapConfig,
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
) -> anyhow::Result<()> {
    let user_service = UserService::new(store, hasher);

    if user_service.count().await? > 0 {
        return Ok(());
    }

    let (password, generated) = match config.admin_password.clone() {
        Some(password) => (password, false),
        None => (generate_random_password(), true),
    };

    let request = CreateUserRequest::new(&config.admin_username, password.clone())
        .with_email(&config.admin_email);
    let record = user_service.create(request).await?;

    if generated {
        warn!(
            username = %record.username,
            "Created initial admin user with a generated password, printed once to stderr"
        );
        let mut stderr = std::io::stderr().lock();
        if let Err(e) = write_generated_password_notice(&mut stderr, &record.username, &password) {
            warn!(error = %e, "Failed to print generated admin password");
        }
    } else {
        info!(username = %record.username, "Created initial admin user");
    }

    Ok(())
}
