//! Application state for shared services

use std::sync::Arc;

use crate::domain::user::CredentialStore;
use crate::infrastructure::auth::SessionService;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionService>,
    pub store: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(session: Arc<SessionService>, store: Arc<dyn CredentialStore>) -> Self {
        Self { session, store }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
