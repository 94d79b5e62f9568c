//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, BootstrapConfig, CorsConfig, LogFormat, LoggingConfig, ServerConfig,
    StorageBackend, StorageConfig,
};
