//! Provider Registry
//!
//! Maps method names to provider constructors. Populated once at startup
//! through `&mut self`, then shared behind an `Arc` where it can only be
//! read, so concurrent resolution needs no locking.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::auth::{AuthError, AuthProvider, ProviderFactory};

/// Registry of authentication providers by method name
#[derive(Clone)]
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
    default_method: String,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("methods", &self.available_methods())
            .field("default_method", &self.default_method)
            .finish()
    }
}

impl ProviderRegistry {
    /// Create an empty registry resolving to `default_method` when no
    /// method is requested
    pub fn new(default_method: impl Into<String>) -> Self {
        Self {
            factories: HashMap::new(),
            default_method: default_method.into(),
        }
    }

    /// Register a provider constructor under `name`.
    ///
    /// An existing entry with the same name is replaced.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn AuthProvider> + Send + Sync + 'static,
    {
        let name = name.into();
        let factory: ProviderFactory = Arc::new(factory);

        if self.factories.insert(name.clone(), factory).is_some() {
            info!(method = %name, "Replaced authentication provider");
        } else {
            info!(method = %name, "Registered authentication provider");
        }
    }

    /// Build the provider for `method`, or for the default method when
    /// `method` is absent or empty
    pub fn resolve(&self, method: Option<&str>) -> Result<Arc<dyn AuthProvider>, AuthError> {
        let method = match method {
            Some(m) if !m.is_empty() => m,
            _ => self.default_method.as_str(),
        };

        match self.factories.get(method) {
            Some(factory) => {
                debug!(method = %method, "Resolved authentication provider");
                Ok(factory())
            }
            None => Err(AuthError::UnknownMethod {
                method: method.to_string(),
                available: self.available_methods(),
            }),
        }
    }

    /// Registered method names, sorted
    pub fn available_methods(&self) -> Vec<String> {
        let mut methods: Vec<String> = self.factories.keys().cloned().collect();
        methods.sort();
        methods
    }

    /// Method used when a request names none
    pub fn default_method(&self) -> &str {
        &self.default_method
    }

    /// Whether `method` has a registered provider
    pub fn contains(&self, method: &str) -> bool {
        self.factories.contains_key(method)
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
