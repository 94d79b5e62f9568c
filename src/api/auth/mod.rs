//! Authentication API endpoints
//!
//! Login, token verification, method discovery and the current identity.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{CurrentIdentity, RequireSubject};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::Identity;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/verify", get(verify))
        .route("/methods", get(list_methods))
        .route("/me", get(get_current_user))
}

/// Login request. Absent fields deserialize as empty and are rejected by
/// the session service with a 400.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub method: Option<String>,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: String,
    pub user: UserResponse,
}

/// User summary (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
}

impl From<&Identity> for UserResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub username: String,
    pub authenticated: bool,
}

#[derive(Debug, Serialize)]
pub struct MethodsResponse {
    pub methods: Vec<String>,
    pub default: String,
}

/// Login with username and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let outcome = state
        .session
        .login(&request.username, &request.password, request.method.as_deref())
        .await?;

    Ok(Json(LoginResponse {
        token: outcome.issued.token,
        token_type: "Bearer",
        expires_at: outcome.issued.expires_at.to_rfc3339(),
        user: UserResponse::from(&outcome.identity),
    }))
}

/// Check the bearer token
///
/// GET /api/auth/verify
pub async fn verify(RequireSubject(username): RequireSubject) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        username,
        authenticated: true,
    })
}

/// GET /api/auth/methods
pub async fn list_methods(State(state): State<AppState>) -> Json<MethodsResponse> {
    let registry = state.session.registry();

    Json(MethodsResponse {
        methods: registry.available_methods(),
        default: registry.default_method().to_string(),
    })
}

/// Full identity for the token subject, re-read from the store
///
/// GET /api/auth/me
pub async fn get_current_user(CurrentIdentity(identity): CurrentIdentity) -> Json<UserResponse> {
    Json(UserResponse::from(&identity))
}
